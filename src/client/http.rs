//! HTTP/JSON implementation of the control-plane client.
//!
//! Every call is a `POST` of a JSON document to the configured endpoint, with
//! the action name carried in the [`ACTION_HEADER`] header. Request and
//! response bodies follow the ELBv2 JSON shapes.

use crate::client::{ApiError, LoadBalancerApi, MemberHealth, TargetState};
use crate::config::BackendApiConfig;
use crate::resource::{ListenerRef, TargetPoolRef};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Header naming the control-plane action being invoked.
pub const ACTION_HEADER: &str = "x-lbfailover-action";

const DESCRIBE_TARGET_HEALTH: &str = "DescribeTargetHealth";
const MODIFY_LISTENER: &str = "ModifyListener";

/// Control-plane client over HTTP/1.1.
///
/// Connections are pooled by the underlying hyper client, so one instance
/// should be built at startup and shared.
#[derive(Clone)]
pub struct HttpLoadBalancerClient {
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: Uri,
    request_timeout: Duration,
}

impl HttpLoadBalancerClient {
    /// Build a client for the configured endpoint.
    pub fn new(config: &BackendApiConfig) -> Result<Self, ApiError> {
        let endpoint: Uri = config
            .endpoint
            .parse()
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(config.connect_timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            endpoint,
            request_timeout: config.request_timeout,
        })
    }

    /// Endpoint this client sends requests to.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// POST `payload` as `action`, returning the body of a 2xx response.
    async fn call<T: Serialize>(&self, action: &'static str, payload: &T) -> Result<Bytes, ApiError> {
        let body = serde_json::to_vec(payload).map_err(|e| ApiError::Decode(e.to_string()))?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACTION_HEADER, action)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| ApiError::InvalidEndpoint(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
                .to_bytes();

            Ok::<_, ApiError>((status, bytes))
        };

        let (status, bytes) = match timeout(self.request_timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ApiError::Timeout {
                    operation: action,
                    after: self.request_timeout,
                });
            }
        };

        debug!(action, status = status.as_u16(), bytes = bytes.len(), "control-plane response");

        if status.is_success() {
            Ok(bytes)
        } else {
            Err(service_error(status, &bytes))
        }
    }
}

#[async_trait]
impl LoadBalancerApi for HttpLoadBalancerClient {
    #[instrument(skip_all, fields(pool = %pool))]
    async fn describe_target_health(
        &self,
        pool: &TargetPoolRef,
    ) -> Result<Vec<MemberHealth>, ApiError> {
        let request = DescribeTargetHealthRequest {
            target_group_arn: pool.as_str(),
        };

        let bytes = self.call(DESCRIBE_TARGET_HEALTH, &request).await?;
        let response: DescribeTargetHealthResponse =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(response
            .target_health_descriptions
            .into_iter()
            .map(MemberHealth::from)
            .collect())
    }

    #[instrument(skip_all, fields(listener = %listener, pool = %pool, order = order))]
    async fn set_default_forward(
        &self,
        listener: &ListenerRef,
        pool: &TargetPoolRef,
        order: u32,
    ) -> Result<(), ApiError> {
        let request = ModifyListenerRequest {
            listener_arn: listener.as_str(),
            default_actions: vec![ForwardAction {
                action_type: "forward",
                target_group_arn: pool.as_str(),
                order,
            }],
        };

        self.call(MODIFY_LISTENER, &request).await?;
        Ok(())
    }
}

/// Build an [`ApiError::Service`] from a non-2xx response.
fn service_error(status: StatusCode, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(err) => ApiError::Service {
            status: status.as_u16(),
            code: err.code,
            message: err.message,
        },
        Err(_) => ApiError::Service {
            status: status.as_u16(),
            code: String::new(),
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeTargetHealthRequest<'a> {
    target_group_arn: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeTargetHealthResponse {
    #[serde(default)]
    target_health_descriptions: Vec<TargetHealthDescription>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TargetHealthDescription {
    target: TargetDescription,
    target_health: TargetHealth,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TargetDescription {
    id: String,
    #[serde(default)]
    port: Option<u16>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TargetHealth {
    state: TargetState,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<TargetHealthDescription> for MemberHealth {
    fn from(desc: TargetHealthDescription) -> Self {
        MemberHealth {
            target_id: desc.target.id,
            port: desc.target.port,
            state: desc.target_health.state,
            reason: desc.target_health.reason,
            description: desc.target_health.description,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ModifyListenerRequest<'a> {
    listener_arn: &'a str,
    default_actions: Vec<ForwardAction<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForwardAction<'a> {
    #[serde(rename = "Type")]
    action_type: &'static str,
    target_group_arn: &'a str,
    order: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}
