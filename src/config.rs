use std::env;
use secrecy::SecretString;

pub const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";
pub const DEFAULT_AI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub content_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub ai_api_key: SecretString,
    pub ai_api_base: String,
    pub ai_model: String,
    pub public_base_url: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let web_server_host =
            env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "localhost".to_string());
        let web_server_port = env::var("WEB_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "study-forge-local".to_string()),
            content_collection: env::var("CONTENT_COLLECTION")
                .unwrap_or_else(|_| "generated_content".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://{}:{}", web_server_host, web_server_port)),
            web_server_host,
            web_server_port,
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            ai_api_key: SecretString::from(env::var("AI_API_KEY").unwrap_or_default()),
            ai_api_base: env::var("AI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_AI_API_BASE.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.ai_api_key.expose_secret().trim().is_empty() {
            panic!("FATAL: AI_API_KEY is not configured! Set AI_API_KEY environment variable.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "study-forge-test".to_string(),
            content_collection: "generated_content".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            ai_api_key: SecretString::from("test_ai_key".to_string()),
            ai_api_base: DEFAULT_AI_API_BASE.to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            cors_allowed_origin: None,
        }
    }
}
