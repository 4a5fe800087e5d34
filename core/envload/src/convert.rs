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

//! Conversion of resolved string values into typed field values.

use crate::error::ConversionError;
use std::collections::HashMap;
use std::time::Duration;

const SEQUENCE_SEPARATOR: char = ',';

/// Types that can be parsed from a single resolved environment value.
///
/// Implement this for custom leaf types and mark the field with `#[env(leaf)]`.
pub trait FromEnvValue: Sized {
    fn from_env_value(value: &str) -> Result<Self, ConversionError>;
}

impl FromEnvValue for String {
    fn from_env_value(value: &str) -> Result<Self, ConversionError> {
        Ok(value.to_owned())
    }
}

macro_rules! impl_from_env_value_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromEnvValue for $ty {
                fn from_env_value(value: &str) -> Result<Self, ConversionError> {
                    value
                        .parse::<$ty>()
                        .map_err(|source| ConversionError::Integer {
                            value: value.to_owned(),
                            source,
                        })
                }
            }
        )*
    };
}

impl_from_env_value_for_integers!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl FromEnvValue for bool {
    fn from_env_value(value: &str) -> Result<Self, ConversionError> {
        match value {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ConversionError::Bool(value.to_owned())),
        }
    }
}

impl FromEnvValue for Duration {
    fn from_env_value(value: &str) -> Result<Self, ConversionError> {
        humantime::parse_duration(value).map_err(|source| ConversionError::Duration {
            value: value.to_owned(),
            source,
        })
    }
}

impl<T: FromEnvValue> FromEnvValue for Vec<T> {
    fn from_env_value(value: &str) -> Result<Self, ConversionError> {
        value
            .split(SEQUENCE_SEPARATOR)
            .map(|element| T::from_env_value(element.trim()))
            .collect()
    }
}

impl FromEnvValue for HashMap<String, String> {
    fn from_env_value(value: &str) -> Result<Self, ConversionError> {
        Ok(serde_json::from_str(value)?)
    }
}
