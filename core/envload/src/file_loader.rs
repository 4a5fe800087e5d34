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

//! Env file loading and multi-file merging.

use crate::env_map::EnvMap;
use crate::error::EnvError;
use crate::parsing::parse_reader;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::info;

/// Loads a single env file.
///
/// `loaded` holds the variables of files loaded earlier in the same load; they
/// are visible to `${NAME}` expansion but are not part of the returned mapping.
pub fn load_file<P: AsRef<Path>>(path: P, loaded: &EnvMap) -> Result<EnvMap, EnvError> {
    let path = path.as_ref();
    info!("Loading environment file from path: '{}'...", path.display());

    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => EnvError::FileNotFound(path.to_path_buf()),
        _ => EnvError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let vars = parse_reader(
        BufReader::new(file),
        &path.display().to_string(),
        loaded,
    )?;
    info!(
        "Loaded {} variable(s) from environment file: '{}'.",
        vars.len(),
        path.display()
    );
    Ok(vars)
}

/// Loads every file in order and merges the results.
///
/// Later files override earlier ones for identical keys.
pub fn load_files<I, P>(paths: I) -> Result<EnvMap, EnvError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut merged = EnvMap::new();
    for path in paths {
        let vars = load_file(path, &merged)?;
        merged.merge(vars);
    }
    Ok(merged)
}
