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

//! Field descriptor tables and the traits implemented by populated records.

use crate::error::{BoxError, EnvError};
use crate::populate::Resolver;

/// Static metadata for a single record field.
///
/// Generated by `#[derive(EnvRecord)]`, one entry per field in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// The Rust field name.
    pub field: &'static str,
    /// Source variable name. Fields without one are never populated from data.
    pub env: Option<&'static str>,
    /// Value used when the variable is not set and the field is not required.
    pub default: Option<&'static str>,
    /// Fail the population when the variable is not set.
    pub required: bool,
    /// Mask the value in log output.
    pub secret: bool,
    /// Descriptor table of the nested record, for record-typed fields.
    pub nested: Option<fn() -> &'static [FieldDescriptor]>,
}

impl FieldDescriptor {
    pub const fn is_record(&self) -> bool {
        self.nested.is_some()
    }
}

/// A record that can be populated from resolved environment values.
///
/// Implemented by `#[derive(EnvRecord)]`.
pub trait EnvRecord {
    /// Returns the descriptor table for this record's fields.
    fn descriptors() -> &'static [FieldDescriptor]
    where
        Self: Sized;

    /// Populates every field in declaration order, stopping at the first error.
    fn populate(&mut self, resolver: &Resolver<'_>) -> Result<(), EnvError>;

    /// Returns the custom parser of this record, if it has one.
    ///
    /// The parser receives the raw value of the field this record is nested in,
    /// after the record's own fields have been populated.
    fn custom_parser(&mut self) -> Option<&mut dyn ParseEnv> {
        None
    }

    /// Returns every source variable name, including those of nested records.
    fn env_var_names() -> Vec<&'static str>
    where
        Self: Sized,
    {
        collect_names(Self::descriptors(), &|_| true)
    }

    /// Returns the source variable names of required fields.
    fn required_env_names() -> Vec<&'static str>
    where
        Self: Sized,
    {
        collect_names(Self::descriptors(), &|field| field.required)
    }

    /// Returns the source variable names of fields marked as secret.
    fn secret_env_names() -> Vec<&'static str>
    where
        Self: Sized,
    {
        collect_names(Self::descriptors(), &|field| field.secret)
    }
}

/// Custom conversion for a nested record from its raw string value.
pub trait ParseEnv {
    fn parse_env(&mut self, value: &str) -> Result<(), BoxError>;
}

fn collect_names(
    fields: &'static [FieldDescriptor],
    filter: &dyn Fn(&FieldDescriptor) -> bool,
) -> Vec<&'static str> {
    let mut names = Vec::new();
    for field in fields {
        if let Some(nested) = field.nested {
            names.extend(collect_names(nested(), filter));
        }
        if let Some(env) = field.env
            && filter(field)
        {
            names.push(env);
        }
    }
    names
}
