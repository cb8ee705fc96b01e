use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::domain::Municipality;
use super::errors::CityError;

/// Provider of the remote municipality listing consumed by the bulk import.
#[async_trait]
pub trait MunicipalitySource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Municipality>, CityError>;
}

/// HTTP client for the IBGE locality API.
pub struct IbgeClient {
    http: reqwest::Client,
    url: String,
}

impl IbgeClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geo_ref/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CityError::Upstream(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }

    pub fn url(&self) -> &str { &self.url }
}

#[async_trait]
impl MunicipalitySource for IbgeClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_all(&self) -> Result<Vec<Municipality>, CityError> {
        let resp = self.http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CityError::Upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| CityError::Upstream(e.to_string()))?;
        let list = resp
            .json::<Vec<Municipality>>()
            .await
            .map_err(|e| CityError::Upstream(format!("invalid municipality payload: {e}")))?;
        debug!(count = list.len(), "municipalities fetched");
        Ok(list)
    }
}

/// Fixed-response sources for tests and doc examples
pub mod mock {
    use super::*;

    pub struct StaticMunicipalitySource {
        municipalities: Vec<Municipality>,
        failure: Option<String>,
    }

    impl StaticMunicipalitySource {
        pub fn new(municipalities: Vec<Municipality>) -> Self {
            Self { municipalities, failure: None }
        }

        pub fn failing(reason: &str) -> Self {
            Self { municipalities: Vec::new(), failure: Some(reason.to_string()) }
        }
    }

    #[async_trait]
    impl MunicipalitySource for StaticMunicipalitySource {
        async fn fetch_all(&self) -> Result<Vec<Municipality>, CityError> {
            match &self.failure {
                Some(reason) => Err(CityError::Upstream(reason.clone())),
                None => Ok(self.municipalities.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> anyhow::Result<String> {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
        });
        Ok(format!("http://{}", addr))
    }

    #[tokio::test]
    async fn ibge_client_decodes_listing() -> anyhow::Result<()> {
        let app = Router::new().route(
            "/municipios",
            get(|| async {
                Json(vec![
                    Municipality::new(3550308, "São Paulo", "SP"),
                    Municipality::new(3304557, "Rio de Janeiro", "RJ"),
                ])
            }),
        );
        let base = serve(app).await?;
        let client = IbgeClient::new(format!("{base}/municipios"), Duration::from_secs(5))?;

        let list = client.fetch_all().await?;
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].name, "Rio de Janeiro");
        assert_eq!(list[1].uf_initials(), Some("RJ"));
        Ok(())
    }

    #[tokio::test]
    async fn ibge_client_reports_http_errors_as_upstream() -> anyhow::Result<()> {
        let app = Router::new().route("/municipios", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = serve(app).await?;
        let client = IbgeClient::new(format!("{base}/municipios"), Duration::from_secs(5))?;

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, CityError::Upstream(_)));
        Ok(())
    }

    #[tokio::test]
    async fn ibge_client_rejects_unexpected_payload() -> anyhow::Result<()> {
        let app = Router::new().route("/municipios", get(|| async { Json(serde_json::json!({"erro": true})) }));
        let base = serve(app).await?;
        let client = IbgeClient::new(format!("{base}/municipios"), Duration::from_secs(5))?;

        let err = client.fetch_all().await.unwrap_err();
        assert_eq!(err.token(), "municipalitiesUnavailable");
        Ok(())
    }
}
