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

//! Typed application configuration from `.env` files and the process environment.
//!
//! Loading happens in two steps:
//! - env files are parsed into an [`EnvMap`], later files overriding earlier ones
//! - a record deriving [`EnvRecord`] is populated from that mapping, falling back
//!   to the process environment and then to field defaults
//!
//! ```ignore
//! #[derive(Debug, Default, EnvRecord)]
//! struct AppConfig {
//!     #[env(name = "APP_PORT", default = "8080")]
//!     port: u16,
//!     #[env(name = "DATABASE_URL", required, secret)]
//!     database_url: String,
//! }
//!
//! let config: AppConfig = envload::load([".env", ".env.local"])?;
//! ```

extern crate self as envload;

mod convert;
mod descriptor;
mod env_map;
mod error;
mod file_loader;
mod loader;
mod parsing;
mod populate;

pub use convert::FromEnvValue;
pub use descriptor::{EnvRecord, FieldDescriptor, ParseEnv};
pub use env_map::EnvMap;
pub use envload_derive::EnvRecord;
pub use error::{BoxError, ConversionError, EnvError};
pub use file_loader::{load_file, load_files};
pub use loader::{DEFAULT_ENV_FILE, fill_specification, load, register_environment};
pub use parsing::{is_valid_name, parse_reader, parse_str};
pub use populate::{Resolver, ValueSource, populate};
