//! The request pipeline: build, gate, dispatch, retry, classify and decode

use crate::config::PipelineConfig;
use crate::descriptor::RequestDescriptor;
use crate::error::{NetworkError, Result};
use crate::http::{DefaultRequestBuilder, JsonResponseDecoder, RequestBuilder, ResponseHandler};
use crate::observability::{
    RequestMetadata, RequestTimer, ResponseMetadata, log_transport_error, log_unreachable,
};
use bytes::Bytes;
use netlayer_core::retry::{FixedRetry, RetryHandler};
use netlayer_transport::{
    HttpTransport, Reachability, Transport, TransportError, TransportResponse,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Executes [`RequestDescriptor`]s end to end.
///
/// A pipeline is an ordinary value: construct one, hold it, clone it freely
/// (all components sit behind `Arc`). Each component can be swapped:
///
/// - `B`: how descriptors become transport requests
/// - `D`: how responses become typed values
/// - `R`: how failed attempts are retried
///
/// # Example
///
/// ```rust,no_run
/// use netlayer::{PipelineConfig, RequestDescriptor, RequestPipeline};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Page {
///     results: Vec<serde_json::Value>,
/// }
///
/// # async fn example() -> netlayer::Result<()> {
/// let pipeline = RequestPipeline::with_http_transport(PipelineConfig::default())?;
///
/// let descriptor = RequestDescriptor::builder()
///     .base_url("https://api.example.com/3")
///     .path("movie/popular")
///     .api_token("secret")
///     .retry_count(2u32)
///     .build()?;
///
/// let page: Page = pipeline.execute(&descriptor).await?;
/// println!("{} results", page.results.len());
/// # Ok(())
/// # }
/// ```
pub struct RequestPipeline<B = DefaultRequestBuilder, D = JsonResponseDecoder, R = FixedRetry> {
    transport: Arc<dyn Transport>,
    reachability: Option<Arc<dyn Reachability>>,
    builder: Arc<B>,
    decoder: Arc<D>,
    retry: Arc<R>,
    config: PipelineConfig,
}

impl RequestPipeline {
    /// Create a pipeline over `transport` with the default components.
    pub fn new(transport: Arc<dyn Transport>, config: PipelineConfig) -> Self {
        Self {
            transport,
            reachability: None,
            builder: Arc::new(DefaultRequestBuilder::new(config.api_key_placement)),
            decoder: Arc::new(JsonResponseDecoder),
            retry: Arc::new(FixedRetry),
            config,
        }
    }

    /// Create a pipeline over a default reqwest-backed [`HttpTransport`].
    pub fn with_http_transport(config: PipelineConfig) -> Result<Self> {
        let transport = HttpTransport::new().map_err(NetworkError::from)?;
        Ok(Self::new(Arc::new(transport), config))
    }
}

impl<B, D, R> RequestPipeline<B, D, R>
where
    B: RequestBuilder,
    D: ResponseHandler,
    R: RetryHandler,
{
    /// Replace the request builder.
    pub fn with_builder<B2: RequestBuilder>(self, builder: B2) -> RequestPipeline<B2, D, R> {
        RequestPipeline {
            transport: self.transport,
            reachability: self.reachability,
            builder: Arc::new(builder),
            decoder: self.decoder,
            retry: self.retry,
            config: self.config,
        }
    }

    /// Replace the response decoder.
    pub fn with_decoder<D2: ResponseHandler>(self, decoder: D2) -> RequestPipeline<B, D2, R> {
        RequestPipeline {
            transport: self.transport,
            reachability: self.reachability,
            builder: self.builder,
            decoder: Arc::new(decoder),
            retry: self.retry,
            config: self.config,
        }
    }

    /// Replace the retry strategy.
    pub fn with_retry_handler<R2: RetryHandler>(self, retry: R2) -> RequestPipeline<B, D, R2> {
        RequestPipeline {
            transport: self.transport,
            reachability: self.reachability,
            builder: self.builder,
            decoder: self.decoder,
            retry: Arc::new(retry),
            config: self.config,
        }
    }

    /// Install a reachability probe, consulted before each call when
    /// [`PipelineConfig::check_reachability`] is set.
    pub fn with_reachability(mut self, probe: Arc<dyn Reachability>) -> Self {
        self.reachability = Some(probe);
        self
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute `descriptor` and decode the successful body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// - build errors (`InvalidUrl`, `ParameterEncodingFailed`,
    ///   `AuthenticationFailed` for a missing token) are returned without
    ///   dispatching anything
    /// - `NetworkFailure(Unreachable)` when the reachability probe fails; the
    ///   probe runs before the build, so while offline it masks build errors
    /// - otherwise the error of the last attempt once the retry budget is spent
    #[tracing::instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute<T>(&self, descriptor: &RequestDescriptor) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.run(descriptor, |decoder: &D, response: &TransportResponse| {
            decoder.decode::<T>(response)
        })
        .await
    }

    /// Execute `descriptor` and return the successful body undecoded.
    ///
    /// Suited to `204 No Content` endpoints and non-JSON payloads. Errors are
    /// reported as for [`execute`](Self::execute).
    #[tracing::instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute_raw(&self, descriptor: &RequestDescriptor) -> Result<Bytes> {
        self.run(descriptor, |decoder: &D, response: &TransportResponse| {
            decoder.decode_raw(response)
        })
        .await
    }

    async fn run<T, F>(&self, descriptor: &RequestDescriptor, decode: F) -> Result<T>
    where
        T: Send,
        F: Fn(&D, &TransportResponse) -> Result<T> + Sync,
    {
        let logging = self.config.logging_enabled;

        if self.config.check_reachability
            && let Some(probe) = &self.reachability
            && !probe.is_reachable().await
        {
            if logging {
                log_unreachable(descriptor.method.as_str(), &descriptor.path);
            }
            return Err(NetworkError::NetworkFailure(TransportError::Unreachable));
        }

        let request = match self.builder.build(descriptor) {
            Ok(request) => request,
            Err(err) => {
                if logging {
                    RequestMetadata::log_build_error(
                        descriptor.method.as_str(),
                        &descriptor.path,
                        &err,
                    );
                }
                return Err(err);
            }
        };

        let request_meta = RequestMetadata::from_request(&request);
        if logging {
            request_meta.log_request();
        }

        let attempts = AtomicU32::new(0);

        let operation = || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let request = &request;
            let request_meta = &request_meta;
            let decode = &decode;

            async move {
                let timer = RequestTimer::start();

                match self.transport.dispatch(request).await {
                    Ok(response) => {
                        let result = decode(self.decoder.as_ref(), &response);
                        if logging {
                            let meta = ResponseMetadata::new(&response, timer.elapsed())
                                .with_attempt(attempt);
                            match &result {
                                Ok(_) => meta.log_success(request_meta),
                                Err(err) => meta.log_error(request_meta, err),
                            }
                        }
                        result
                    }
                    Err(err) => {
                        let err = NetworkError::from(err);
                        if logging {
                            log_transport_error(request_meta, &err, timer.elapsed(), attempt);
                        }
                        Err(err)
                    }
                }
            }
        };

        self.retry
            .execute_with_retry(descriptor.retry_count, operation)
            .await
    }
}

impl<B, D, R> Clone for RequestPipeline<B, D, R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            reachability: self.reachability.clone(),
            builder: Arc::clone(&self.builder),
            decoder: Arc::clone(&self.decoder),
            retry: Arc::clone(&self.retry),
            config: self.config.clone(),
        }
    }
}

impl<B, D, R> fmt::Debug for RequestPipeline<B, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .field("has_reachability", &self.reachability.is_some())
            .finish_non_exhaustive()
    }
}
