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

use clap::Parser;
use envload::DEFAULT_ENV_FILE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "envload",
    version,
    about = "Print the resolved variables of one or more .env files"
)]
pub struct EnvloadArgs {
    /// Env files to load, in order. Later files override earlier ones.
    #[arg(value_name = "FILE", default_value = DEFAULT_ENV_FILE)]
    pub files: Vec<PathBuf>,

    /// Print the variables as a JSON object
    #[arg(long, conflicts_with = "keys_only")]
    pub json: bool,

    /// Print variable names only
    #[arg(long)]
    pub keys_only: bool,

    /// Variable whose value is replaced with a mask in the output
    #[arg(short, long = "mask", value_name = "KEY")]
    pub masked: Vec<String>,
}
