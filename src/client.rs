//! Veridu API client: request gateway and session state

use tracing::{debug, warn};

use crate::config::{ApiConfig, Credentials};
use crate::envelope::{self, JsonObject};
use crate::error::{Result, VeriduError};
use crate::signer::Signer;
use crate::transport::{HttpRequest, Method, Params, ReqwestTransport, Transport};

/// Header carrying the client key
pub const CLIENT_HEADER: &str = "Veridu-Client";

/// Header carrying the session token
pub const SESSION_HEADER: &str = "Veridu-Session";

/// Client for the Veridu API
///
/// Holds the session token and the type of the last API error. Calls that
/// update that state take `&mut self`, so one instance serves one logical
/// session at a time. The nonce of a signed call lives only for that call.
///
/// # Example
///
/// ```rust,no_run
/// use veridu_client::{ApiConfig, Credentials, Method, Params, VeriduClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = VeriduClient::with_config(
///     Credentials::from_env()?,
///     ApiConfig::from_env()?,
/// )?;
///
/// let mut data = Params::new();
/// data.insert("type".to_string(), "facebook".to_string());
///
/// match client.signed_fetch(Method::Post, "session/limited", Some(data)).await {
///     Ok(payload) => println!("{:?}", payload),
///     Err(err) => println!("{} ({:?})", err, client.last_error()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct VeriduClient<T: Transport = ReqwestTransport> {
    config: ApiConfig,
    signer: Signer,
    transport: T,
    session: Option<String>,
    last_error: Option<String>,
}

impl VeriduClient<ReqwestTransport> {
    /// Create a client with the default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ApiConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(credentials: Credentials, config: ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(credentials, config, transport))
    }
}

impl<T: Transport> VeriduClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(credentials: Credentials, config: ApiConfig, transport: T) -> Self {
        let signer = Signer::new(credentials, config.version.clone());
        Self {
            config,
            signer,
            transport,
            session: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ==================== Session ====================

    /// Attach a session token to all subsequent requests.
    pub fn set_session(&mut self, token: impl Into<String>) {
        self.session = Some(token.into());
        debug!("Session set");
    }

    /// Current session token.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Drop the session token.
    pub fn purge_session(&mut self) {
        if self.session.take().is_some() {
            debug!("Session purged");
        }
    }

    /// Error type reported by the most recent failed API call.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ==================== Requests ====================

    /// Absolute URL of a resource.
    pub fn resource_url(&self, resource: &str) -> String {
        self.config.resource_url(resource)
    }

    /// Send a request and validate the response envelope.
    pub async fn fetch(
        &mut self,
        method: Method,
        resource: &str,
        data: Option<Params>,
    ) -> Result<JsonObject> {
        let request = HttpRequest {
            method,
            url: self.resource_url(resource),
            headers: self.standing_headers(),
            params: data.unwrap_or_default(),
        };

        debug!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        let result = envelope::validate(&response.body);

        if let Err(VeriduError::Api { error_type, .. }) = &result {
            self.last_error = Some(error_type.clone());
        }
        result
    }

    /// Sign a request, send it, and require the response to echo the nonce.
    ///
    /// Signature fields overwrite same-named keys in `data`. The nonce is
    /// removed from the returned payload.
    pub async fn signed_fetch(
        &mut self,
        method: Method,
        resource: &str,
        data: Option<Params>,
    ) -> Result<JsonObject> {
        let signature = self
            .signer
            .sign(method.as_str(), &self.resource_url(resource));

        let mut payload = data.unwrap_or_default();
        payload.extend(signature.to_params());

        let response = self.fetch(method, resource, Some(payload)).await?;
        envelope::verify_nonce(response, &signature.nonce).inspect_err(|_| {
            warn!("{} {} rejected: nonce mismatch", method, resource);
        })
    }

    fn standing_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (CLIENT_HEADER.to_string(), self.signer.client_key().to_string()),
            ("User-Agent".to_string(), self.config.user_agent.clone()),
        ];
        if let Some(ref session) = self.session {
            headers.push((SESSION_HEADER.to_string(), session.clone()));
        }
        headers
    }
}
