// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;

use crate::client::ContainerSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    id: &'a str,
    state: String,
    interior_state: String,
    status: &'a Option<serde_json::Value>,
}

pub fn print_snapshot(snapshot: &ContainerSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let view = SnapshotView {
                id: snapshot.id.as_str(),
                state: snapshot.state.to_string(),
                interior_state: snapshot.interior_state.to_string(),
                status: &snapshot.status,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Text => {
            println!("{}\t{}\t{}", snapshot.id, snapshot.state, snapshot.interior_state);
            if let Some(status) = &snapshot.status {
                println!("{status}");
            }
        }
    }
    Ok(())
}

pub fn print_ids(ids: &[corral_core::ContainerId], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(ids)?),
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}
