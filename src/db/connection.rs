use crate::catalog::Credential;
use crate::config::ConnectionSettings;
use crate::error::AppError;
use crate::instance::InstanceRef;

pub const DEFAULT_PORT: u16 = 1433;
const APPLICATION_NAME: &str = "sqlpf";

/// How the TCP endpoint for an instance is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Port(u16),
    /// Named instance without a port; resolved through SQL Browser.
    Browser(String),
}

pub fn endpoint(settings: &ConnectionSettings, instance: &InstanceRef) -> Endpoint {
    match (instance.port, &instance.instance) {
        (Some(port), _) => Endpoint::Port(port),
        (None, Some(name)) => Endpoint::Browser(name.clone()),
        (None, None) => Endpoint::Port(settings.port.unwrap_or(DEFAULT_PORT)),
    }
}

pub fn build_config(
    settings: &ConnectionSettings,
    instance: &InstanceRef,
    credential: &Credential,
) -> Result<tiberius::Config, AppError> {
    let mut config = tiberius::Config::new();
    config.host(&instance.host);
    config.database("master");
    config.application_name(APPLICATION_NAME);

    match endpoint(settings, instance) {
        Endpoint::Port(port) => config.port(port),
        Endpoint::Browser(name) => config.instance_name(name),
    }

    credential.validate()?;
    if let (Some(user), Some(pass)) = (&credential.user, &credential.password) {
        config.authentication(tiberius::AuthMethod::sql_server(user, pass));
    }

    if settings.encrypt {
        config.encryption(tiberius::EncryptionLevel::Required);
    } else {
        config.encryption(tiberius::EncryptionLevel::NotSupported);
    }

    if settings.trust_cert {
        config.trust_cert();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn settings() -> ConnectionSettings {
        ConnectionSettings::default()
    }

    #[test]
    fn explicit_port_wins() {
        let instance = InstanceRef::parse(r"srv1\BI,1500").expect("parse");
        assert_eq!(endpoint(&settings(), &instance), Endpoint::Port(1500));
    }

    #[test]
    fn named_instance_uses_browser() {
        let instance = InstanceRef::parse(r"srv1\BI").expect("parse");
        assert_eq!(
            endpoint(&settings(), &instance),
            Endpoint::Browser("BI".to_string())
        );
    }

    #[test]
    fn default_instance_uses_configured_port() {
        let mut settings = settings();
        settings.port = Some(1444);
        let instance = InstanceRef::new("srv1");
        assert_eq!(endpoint(&settings, &instance), Endpoint::Port(1444));
        assert_eq!(
            endpoint(&ConnectionSettings::default(), &instance),
            Endpoint::Port(DEFAULT_PORT)
        );
    }

    #[test]
    fn builds_config_address() {
        let instance = InstanceRef::parse("db.example,1444").expect("parse");
        let credential = Credential::sql_login("sa", "secret");
        let config = build_config(&settings(), &instance, &credential).expect("config");
        assert_eq!(config.get_addr(), "db.example:1444");
    }

    #[test]
    fn user_without_password_is_rejected() {
        let credential = Credential {
            user: Some("sa".to_string()),
            password: None,
        };
        let err = build_config(&settings(), &InstanceRef::new("srv1"), &credential)
            .expect_err("should fail");
        assert_eq!(err.kind, ErrorKind::Config);
    }
}
