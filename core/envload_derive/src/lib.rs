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

//! Proc macro generating field descriptor tables for environment-populated records.
//!
//! `#[derive(EnvRecord)]` generates:
//! - A static descriptor table with one entry per field, in declaration order
//! - The `populate` walk that assigns leaf fields and descends into nested records
//! - `ENV_VAR_*` constants for every leaf field bound to a variable
//!
//! # Type Inference
//!
//! - **Leaf types** (`String`, integers, `bool`, `Duration`, `Vec<T>`, `HashMap<K, V>`):
//!   converted through `FromEnvValue`
//! - **Nested types**: every other type is assumed to be a record deriving `EnvRecord`
//! - `f32`, `f64`, `char`, `Option<T>`, references, tuples and arrays are rejected
//!   on fields bound to a variable

mod env_record;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro for populating a struct from env files and the process environment.
///
/// # Container Attributes
/// - `#[env(custom_parser)]` - The record implements `ParseEnv` and receives the raw
///   value of the field it is nested in
///
/// # Field Attributes
/// - `#[env(name = "VAR")]` - Source variable name. Leaf fields without it are never set
/// - `#[env(default = "value")]` - Used when the variable is not set
/// - `#[env(required)]` - Fail when the variable is not set
/// - `#[env(secret)]` - Mask the value in log output
/// - `#[env(leaf)]` - Treat a custom type as a value implementing `FromEnvValue`
/// - `#[env(skip)]` - Exclude the field entirely
///
/// # Example
/// ```ignore
/// #[derive(Default, EnvRecord)]
/// pub struct AppConfig {
///     #[env(name = "APP_PORT", default = "8080")]
///     pub port: u16,
///     #[env(name = "APP_TIMEOUT", default = "30s")]
///     pub timeout: Duration,
///     #[env(name = "DATABASE_URL", required, secret)]
///     pub database_url: String,
///     pub cache: CacheConfig,   // Nested: populated recursively
/// }
/// ```
#[proc_macro_derive(EnvRecord, attributes(env))]
pub fn derive_env_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    env_record::generate_impl(&input).into()
}
