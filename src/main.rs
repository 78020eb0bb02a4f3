// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use docsift::binary::{read_header, Footer};
use docsift::build::{run_build, run_update, source_date_epoch};
use docsift::config::QueryOptions;
use docsift::engine::IndexHandle;
use docsift::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
use cli::display::{self, *};
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DOCSIFT_LOG")
                .unwrap_or_else(|_| "docsift=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Index { input, output } => index(&input, &output),
        Commands::Update {
            file,
            input,
            pages,
            removed,
        } => update(&file, &input, &pages, &removed),
        Commands::Inspect { file, top_terms } => inspect(&file, top_terms),
        Commands::Search {
            file,
            query,
            limit,
            locale,
            json,
        } => search(&file, &query, limit, locale.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn index(input: &Path, output: &Path) -> Result<()> {
    let built = run_build(input, output, source_date_epoch())?;
    eprintln!("✅ Build complete");
    eprintln!(
        "   {} pages │ {} sections │ {} terms │ {}",
        built.documents,
        built.sections,
        built.terms,
        format_size(built.bytes)
    );
    eprintln!("  ✓ {}", built.index_path.display());
    if let Some(path) = &built.translations_path {
        eprintln!("  ✓ {}", path.display());
    }
    Ok(())
}

fn update(file: &Path, input: &Path, pages: &[String], removed: &[String]) -> Result<()> {
    if pages.is_empty() && removed.is_empty() {
        return Err(Error::Config("nothing to update: pass --page or --remove".to_string()));
    }
    let updated = run_update(file, input, pages, removed, source_date_epoch())?;
    let s = updated.summary;
    eprintln!("✅ Update complete");
    eprintln!(
        "   {} removed │ {} inserted │ {} unchanged │ {} sections │ {}",
        s.removed,
        s.inserted,
        s.unchanged,
        updated.sections,
        format_size(updated.bytes)
    );
    eprintln!("  ✓ {}", updated.index_path.display());
    Ok(())
}

fn compress_brotli(data: &[u8]) -> usize {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        if encoder.write_all(data).is_err() {
            return data.len();
        }
    }
    compressed.len()
}

fn inspect(file: &Path, top_terms: usize) -> Result<()> {
    let bytes = read_file(file)?;
    // read_header verifies magic, version, bounds and checksum before we print anything
    let header = read_header(&bytes)?;
    let footer = Footer::read(&bytes)?;
    let index = docsift::binary::decode_index(&bytes)?;
    let offsets = header.block_offsets();

    section_top(&format!("DOCSIFT v{}.{}", header.major, header.minor));
    row(&field("file", &file.display().to_string()));
    row(&field("size", &format_size(bytes.len())));
    let brotli = compress_brotli(&bytes);
    row(&field(
        "brotli",
        &format!("{} ({})", format_size(brotli), savings_colored(bytes.len(), brotli)),
    ));
    row(&field("locale", &header.locale));
    row(&field("built at", &header.built_at.to_string()));
    row(&field(
        "crc32",
        &format!(
            "{:08x} {}",
            footer.crc32,
            ok_or_bad(footer.verify(&bytes[..bytes.len() - Footer::SIZE]).is_ok(), "ok", "mismatch")
        ),
    ));

    section_mid("BLOCKS");
    let blocks: [(&str, usize, usize); 6] = [
        ("header", 0, header.header_len as usize),
        ("dictionary", offsets.dictionary.0, offsets.dictionary.1),
        ("postings", offsets.postings.0, offsets.postings.1),
        ("sections", offsets.sections.0, offsets.sections.1),
        ("stats", offsets.stats.0, offsets.stats.1),
        ("footer", bytes.len() - Footer::SIZE, bytes.len()),
    ];
    for (name, start, end) in blocks {
        let size = end - start;
        let pct = size as f64 * 100.0 / bytes.len() as f64;
        row(&format!(
            " {:<12} {:>10} {:>10}  {}",
            name,
            format!("@{}", start),
            format_size(size),
            themed(GRAY, &[], &format!("{:>5.1}%", pct))
        ));
    }
    let unknown = (bytes.len() - Footer::SIZE).saturating_sub(offsets.end());
    if unknown > 0 {
        row(&format!(" {:<12} {:>10} {:>10}  (newer minor, ignored)", "extra", "", format_size(unknown)));
    }

    section_mid("CONTENTS");
    let stats = index.stats();
    row(&field("pages", &stats.doc_count.to_string()));
    row(&field("sections", &stats.section_count.to_string()));
    row(&field("terms", &header.term_count.to_string()));
    let settings = index.settings();
    row(&field(
        "field weights",
        &format!("{} / {} / {}", settings.weights.title, settings.weights.heading, settings.weights.body),
    ));
    row(&field("bm25", &format!("k1={} b={}", settings.bm25.k1, settings.bm25.b)));
    row(&field("stopwords", &settings.stopwords.len().to_string()));

    if top_terms > 0 {
        section_mid("TOP TERMS");
        let mut terms: Vec<(&str, usize)> = index.terms().map(|t| (t, index.doc_freq(t))).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (term, df) in terms.into_iter().take(top_terms) {
            row(&format!(" {:<24} {:>6} sections", term, df));
        }
    }
    section_bot();
    Ok(())
}

fn search(file: &Path, query: &str, limit: usize, locale: Option<&str>, json: bool) -> Result<()> {
    let bytes = read_file(file)?;
    let options = QueryOptions {
        top_k: limit.max(1),
        ..QueryOptions::default()
    };
    let handle = IndexHandle::load(&bytes, options)?;
    let response = handle.search(query, locale);

    if json {
        let out = serde_json::to_string_pretty(&response).map_err(|e| Error::Internal(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if let Some(diagnostic) = &response.diagnostic {
        eprintln!("⚠️  {}", diagnostic);
    }
    if response.is_empty() {
        println!("{}", themed(GRAY, &[], &format!("No results for \"{}\"", response.query)));
        return Ok(());
    }
    for (rank, hit) in response.hits.iter().enumerate() {
        println!(
            "{:>3}. {} {}  {}",
            rank + 1,
            score_value(hit.score),
            themed(BLUE, &[BOLD], &hit.title),
            themed(GRAY, &[], &hit.href())
        );
        if !hit.breadcrumb.is_empty() {
            println!("          {}", themed(GRAY, &[DIM], &hit.breadcrumb.join(" › ")));
        }
        if !hit.snippet.text.is_empty() {
            println!("          {}", display::snippet(&hit.snippet));
        }
    }
    if response.truncated {
        eprintln!("⚠️  query truncated to {} characters", handle.options().max_query_chars);
    }
    Ok(())
}
