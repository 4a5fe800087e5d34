/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! Entry points combining env file loading and record population.

use crate::descriptor::EnvRecord;
use crate::error::EnvError;
use crate::file_loader::load_files;
use crate::populate::populate;
use std::path::Path;
use tracing::{error, info};

/// Env file read by [`register_environment`] when the `development` feature is enabled.
pub const DEFAULT_ENV_FILE: &str = ".env";

#[cfg(feature = "development")]
const REGISTERED_ENV_FILES: &[&str] = &[DEFAULT_ENV_FILE];
#[cfg(not(feature = "development"))]
const REGISTERED_ENV_FILES: &[&str] = &[];

/// Loads the env files in order and populates `target` from them, falling back
/// to the process environment and field defaults.
pub fn fill_specification<T, I, P>(target: &mut T, paths: I) -> Result<(), EnvError>
where
    T: EnvRecord,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let vars = load_files(paths).map_err(|e| EnvError::Load(Box::new(e)))?;
    populate(target, &vars).map_err(|e| EnvError::Populate(Box::new(e)))
}

/// Builds a record from its default value and populates it.
pub fn load<T, I, P>(paths: I) -> Result<T, EnvError>
where
    T: EnvRecord + Default,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut record = T::default();
    fill_specification(&mut record, paths)?;
    Ok(record)
}

/// Populates `target` for application startup.
///
/// Builds with the `development` feature read [`DEFAULT_ENV_FILE`] first; other
/// builds use the process environment only.
pub fn register_environment<T: EnvRecord>(target: &mut T) -> Result<(), EnvError> {
    info!(
        "Registering environment from {} env file(s).",
        REGISTERED_ENV_FILES.len()
    );
    fill_specification(target, REGISTERED_ENV_FILES)
        .inspect_err(|e| error!("Failed to register environment: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvRecord;
    use serial_test::serial;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default, EnvRecord)]
    struct AppConfig {
        #[env(name = "LOADER_TEST_NAME", required)]
        name: String,
        #[env(name = "LOADER_TEST_TIMEOUT", default = "30s")]
        timeout: Duration,
    }

    fn env_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    #[serial]
    #[test]
    fn load_populates_from_files() {
        let file = env_file("LOADER_TEST_NAME=app\nLOADER_TEST_TIMEOUT=1m");

        let config: AppConfig = load([file.path()]).expect("load failed");

        assert_eq!(config.name, "app");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[serial]
    #[test]
    fn fill_specification_wraps_load_errors() {
        let file = env_file("bad-name=1");
        let mut config = AppConfig::default();

        let error = fill_specification(&mut config, [file.path()]).unwrap_err();

        assert!(matches!(error, EnvError::Load(_)));
        assert!(matches!(
            error.root(),
            EnvError::InvalidVariableName { .. }
        ));
        assert!(error.to_string().starts_with("error loading .env file: "));
    }

    #[serial]
    #[test]
    fn fill_specification_wraps_populate_errors() {
        let file = env_file("OTHER=1");
        let mut config = AppConfig::default();

        let error = fill_specification(&mut config, [file.path()]).unwrap_err();

        assert!(matches!(error, EnvError::Populate(_)));
        assert!(matches!(
            error.root(),
            EnvError::MissingRequired("LOADER_TEST_NAME")
        ));
        assert_eq!(
            error.to_string(),
            "field load environment: required environment variable LOADER_TEST_NAME is missing"
        );
    }

    #[cfg(not(feature = "development"))]
    #[serial]
    #[test]
    fn register_environment_reads_process_environment() {
        use std::env;

        unsafe {
            env::set_var("LOADER_TEST_NAME", "from_process");
        }
        let mut config = AppConfig::default();

        let result = register_environment(&mut config);

        unsafe {
            env::remove_var("LOADER_TEST_NAME");
        }
        result.expect("register_environment failed");
        assert_eq!(config.name, "from_process");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
