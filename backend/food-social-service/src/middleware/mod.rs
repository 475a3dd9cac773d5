/// HTTP middleware for food-social-service
///
/// Records request latency per matched route into the Prometheus histogram
/// and emits a debug event for each completed request.
use crate::metrics::HTTP_REQUEST_DURATION_SECONDS;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            // Unmatched paths share a single route label.
            let (route, status) = match &res {
                Ok(r) => (
                    r.request()
                        .match_pattern()
                        .unwrap_or_else(|| "unmatched".to_string()),
                    r.status().as_u16().to_string(),
                ),
                Err(e) => (
                    "unmatched".to_string(),
                    e.as_response_error().status_code().as_u16().to_string(),
                ),
            };

            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route, &status])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(
                %method,
                %route,
                %status,
                elapsed_ms = elapsed.as_millis() as u64,
                "request completed"
            );
            res
        })
    }
}
