use crate::output;

use std::net::SocketAddr;

use clap::Args;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use user_rpc::{shutdown_signal, RpcServer, ServerConfig};
use user_service::{IdPolicy, StoreConfig, UpdateValidation};

/// Serve the user directory over HTTP
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "USERDIR_BIND", default_value = "127.0.0.1:5000", value_name = "ADDR")]
    pub bind: SocketAddr,

    /// How new user ids are assigned (monotonic, count)
    #[arg(
        long,
        env = "USERDIR_ID_POLICY",
        default_value = "monotonic",
        value_name = "POLICY"
    )]
    pub id_policy: IdPolicy,

    /// Which fields an update must carry (strict, present-only)
    #[arg(
        long,
        env = "USERDIR_UPDATE_VALIDATION",
        default_value = "strict",
        value_name = "MODE"
    )]
    pub update_validation: UpdateValidation,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            store: StoreConfig::default()
                .with_id_policy(self.id_policy)
                .with_update_validation(self.update_validation),
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let server = RpcServer::with_config(args.server_config());
    let listener = server
        .bind()
        .await
        .wrap_err_with(|| format!("Failed to bind {}", args.bind))?;

    output::status("Listening", &format!("http://{}/api/user", listener.local_addr()?));
    output::info(&format!(
        "id policy: {}, update validation: {}",
        args.id_policy, args.update_validation
    ));
    output::dim("Press Ctrl-C to stop");

    server.serve(listener, shutdown_signal()).await?;

    output::status("Stopped", "user directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn test_parse_policies() {
        let cli = TestCli::try_parse_from([
            "userdir",
            "--bind",
            "0.0.0.0:8080",
            "--id-policy",
            "count",
            "--update-validation",
            "present-only",
        ])
        .unwrap();

        let config = cli.serve.server_config();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.store.id_policy, IdPolicy::Count);
        assert_eq!(config.store.update_validation, UpdateValidation::PresentOnly);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = TestCli::try_parse_from(["userdir", "--id-policy", "random"]);
        assert!(result.is_err());
    }
}
