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

//! Error types for loading and populating environment records.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type returned by [`ParseEnv`](crate::ParseEnv) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for env file loading and record population.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The env file could not be found.
    #[error("{} does not exist", .0.display())]
    FileNotFound(PathBuf),
    /// The env file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A key does not match `[a-zA-Z_][a-zA-Z0-9_]*`.
    #[error("invalid environment variable name: {name} ({origin}:{line})")]
    InvalidVariableName {
        name: String,
        origin: String,
        line: usize,
    },
    /// A field marked as required has no value in any source.
    #[error("required environment variable {0} is missing")]
    MissingRequired(&'static str),
    /// A resolved value could not be converted to the field type.
    #[error("error setting field {field}: {source}")]
    Conversion {
        field: &'static str,
        #[source]
        source: ConversionError,
    },
    /// A custom parser rejected the raw value.
    #[error(transparent)]
    CustomParser(BoxError),
    /// Loading the env files failed.
    #[error("error loading .env file: {0}")]
    Load(#[source] Box<EnvError>),
    /// Populating the record failed.
    #[error("field load environment: {0}")]
    Populate(#[source] Box<EnvError>),
}

/// The error type for converting a raw string into a typed value.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid integer {value:?}: {source}")]
    Integer {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid boolean {0:?}")]
    Bool(String),
    #[error("invalid duration {value:?}: {source}")]
    Duration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid JSON object: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned by custom [`FromEnvValue`](crate::FromEnvValue) implementations.
    #[error("{0}")]
    Custom(String),
}

impl EnvError {
    /// Returns the innermost error, unwrapping the load/populate stage wrappers.
    pub fn root(&self) -> &EnvError {
        match self {
            Self::Load(inner) | Self::Populate(inner) => inner.root(),
            other => other,
        }
    }
}
