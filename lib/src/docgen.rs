// Copyright 2022 Red Hat, Inc.
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Man pages for `ctrctl` and each of its visible subcommands.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Command, CommandFactory};

/// Render section 1 pages into `directory`, returning the written paths.
pub(crate) fn generate_manpages(directory: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let version = env!("CARGO_PKG_VERSION");
    let top = crate::cli::Cli::command().version(version);
    let mut pages = vec![(top.get_name().to_string(), top.clone())];
    for sub in top.get_subcommands().filter(|c| !c.is_hide_set()) {
        // `ctrctl export` is documented as ctrctl-export(1)
        let name = format!("{}-{}", top.get_name(), sub.get_name());
        let bin_name = format!("{} {}", top.get_name(), sub.get_name());
        let sub = sub
            .clone()
            .name(name.clone())
            .bin_name(bin_name)
            .version(version)
            .disable_version_flag(true);
        pages.push((name, sub));
    }
    pages
        .into_iter()
        .map(|(name, cmd)| render(directory, &name, cmd, version))
        .collect()
}

fn render(directory: &Utf8Path, name: &str, cmd: Command, version: &str) -> Result<Utf8PathBuf> {
    let path = directory.join(format!("{name}.1"));
    println!("Generating {path}...");
    let f = File::create(&path).with_context(|| format!("opening {path}"))?;
    let mut out = BufWriter::new(f);
    clap_mangen::Man::new(cmd)
        .section("1")
        .source(format!("ctrctl {version}"))
        .render(&mut out)
        .with_context(|| format!("rendering {name}.1"))?;
    out.flush().context("flushing man page")?;
    Ok(path)
}

#[test]
fn test_generate_manpages() {
    let td = tempfile::tempdir().unwrap();
    let dir = Utf8Path::from_path(td.path()).unwrap();
    let pages = generate_manpages(dir).unwrap();
    let names: Vec<&str> = pages.iter().filter_map(|p| p.file_name()).collect();
    assert_eq!(names, ["ctrctl.1", "ctrctl-export.1", "ctrctl-import.1"]);
    for page in pages.iter() {
        let contents = std::fs::read_to_string(page).unwrap();
        assert!(contents.contains(".TH"), "{page}");
    }
    let export = std::fs::read_to_string(dir.join("ctrctl-export.1")).unwrap();
    assert!(export.contains("metadata"));
    assert!(!dir.join("ctrctl-man.1").exists());
}
