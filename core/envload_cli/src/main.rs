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

mod args;

use anyhow::Context;
use args::EnvloadArgs;
use clap::Parser;
use envload::load_files;
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SECRET_MASK: &str = "******";

fn main() -> anyhow::Result<()> {
    let args = EnvloadArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("INFO")))
        .with_writer(std::io::stderr)
        .init();

    let vars = load_files(&args.files).with_context(|| {
        format!(
            "Failed to load env files: {}",
            args.files
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    info!("Resolved {} variable(s).", vars.len());

    let entries: BTreeMap<String, String> = vars
        .into_iter()
        .map(|(key, value)| {
            if args.masked.contains(&key) {
                (key, SECRET_MASK.to_owned())
            } else {
                (key, value)
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if args.keys_only {
        for key in entries.keys() {
            println!("{key}");
        }
    } else {
        for (key, value) in &entries {
            println!("{key}={}", value.escape_default());
        }
    }

    Ok(())
}
