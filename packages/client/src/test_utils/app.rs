use std::{path::PathBuf, sync::Arc};

use utils::config::ConfigBuilder;

use crate::{args::CliArgs, config::Config};

#[derive(Clone)]
pub struct TestApp {
    pub config: Arc<Config>,
}

impl TestApp {
    pub fn zeroed_cli_args() -> CliArgs {
        CliArgs {
            data: Some(tempfile::tempdir().unwrap().path().to_path_buf()),
            home: Some(tempfile::tempdir().unwrap().path().to_path_buf()),
            // points at a non-existing file so that we don't load a real .env in tests
            dotenv: Some(
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("tests")
                    .join("non-existant-file"),
            ),
            endpoint: None,
            log_level: Vec::new(),
            request_timeout_ms: None,
            bearer_token: None,
        }
    }

    pub fn new() -> Self {
        Self::new_with_args(Self::zeroed_cli_args())
    }

    pub fn new_with_args(cli_args: CliArgs) -> Self {
        let config = Arc::new(ConfigBuilder::new(cli_args).build().unwrap());

        crate::init_tracing_tests();

        Self { config }
    }
}
