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

//! Field value resolution and record population.

use crate::convert::FromEnvValue;
use crate::descriptor::{EnvRecord, FieldDescriptor};
use crate::env_map::EnvMap;
use crate::error::EnvError;
use std::env;
use std::fmt::{self, Display};
use tracing::debug;

const SECRET_MASK: &str = "******";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    File,
    Process,
    Default,
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "env file"),
            Self::Process => write!(f, "process environment"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolves field values against loaded env file variables, the process
/// environment and field defaults, in that order.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    vars: &'a EnvMap,
}

impl<'a> Resolver<'a> {
    pub fn new(vars: &'a EnvMap) -> Self {
        Self { vars }
    }

    /// Resolves the raw value for `field`.
    ///
    /// Returns an empty string for fields without a source variable and for
    /// optional fields with neither a value nor a default.
    pub fn resolve(&self, field: &FieldDescriptor) -> Result<String, EnvError> {
        let Some(env_name) = field.env else {
            return Ok(String::new());
        };

        let (value, source) = if let Some(value) = self.vars.get(env_name) {
            (value.to_owned(), ValueSource::File)
        } else if let Some(value) = process_var(env_name) {
            (value, ValueSource::Process)
        } else if field.required {
            return Err(EnvError::MissingRequired(env_name));
        } else {
            (
                field.default.unwrap_or_default().to_owned(),
                ValueSource::Default,
            )
        };

        if !value.is_empty() {
            let display_value = if field.secret {
                SECRET_MASK
            } else {
                value.as_str()
            };
            debug!(
                "{env_name} resolved from {source} for field '{}': {display_value}",
                field.field
            );
        }
        Ok(value)
    }

    /// Resolves and converts a leaf field. Empty values leave the field untouched.
    pub fn assign<T: FromEnvValue>(
        &self,
        target: &mut T,
        field: &FieldDescriptor,
    ) -> Result<(), EnvError> {
        let value = self.resolve(field)?;
        if value.is_empty() {
            return Ok(());
        }
        *target = T::from_env_value(&value).map_err(|source| EnvError::Conversion {
            field: field.field,
            source,
        })?;
        Ok(())
    }

    /// Populates a nested record, then hands the raw value of `field` to the
    /// record's custom parser, if it has one and the value is not empty.
    pub fn descend<R: EnvRecord>(
        &self,
        target: &mut R,
        field: &FieldDescriptor,
    ) -> Result<(), EnvError> {
        target.populate(self)?;

        let Some(parser) = target.custom_parser() else {
            return Ok(());
        };
        let value = self.resolve(field)?;
        if value.is_empty() {
            return Ok(());
        }
        parser.parse_env(&value).map_err(EnvError::CustomParser)
    }
}

/// Populates `target` from the resolved variables.
///
/// Population is not transactional: fields processed before a failing field
/// keep their new values.
pub fn populate<T: EnvRecord>(target: &mut T, vars: &EnvMap) -> Result<(), EnvError> {
    target.populate(&Resolver::new(vars))
}

fn process_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
