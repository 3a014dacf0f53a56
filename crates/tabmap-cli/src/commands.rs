use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span};

use tabmap_cli::settings::{Settings, default_cache_dir};
use tabmap_core::{RestoreOutcome, Session, SessionOptions};
use tabmap_ingest::{read_source_dataset, read_target_schema};
use tabmap_map::{ConfigCache, FileStore, MemoryStore, value_domain};
use tabmap_output::{OutputFormat, write_table};

use crate::cli::{ExportArgs, HeadersArgs, ValuesArgs};
use crate::summary::{
    print_filters, print_headers, print_mapping, print_preview, print_snapshot, print_values,
};

pub fn run_headers(args: &HeadersArgs) -> Result<()> {
    let headers = if args.source {
        read_source_dataset(&args.file)
            .with_context(|| format!("read source {}", args.file.display()))?
            .headers()
            .to_vec()
    } else {
        read_target_schema(&args.file)
            .with_context(|| format!("read target {}", args.file.display()))?
            .headers()
            .to_vec()
    };
    print_headers(&headers);
    Ok(())
}

pub fn run_values(args: &ValuesArgs) -> Result<()> {
    let dataset = read_source_dataset(&args.source)
        .with_context(|| format!("read source {}", args.source.display()))?;
    if !dataset.has_header(&args.column) {
        return Err(anyhow!(
            "source {} has no column '{}'",
            args.source.display(),
            args.column
        ));
    }
    print_values(&args.column, &value_domain(&dataset, &args.column));
    Ok(())
}

pub fn run_export(args: &ExportArgs, settings: &Settings, cache_dir: Option<&Path>) -> Result<()> {
    let span = info_span!("export", target = %args.target.display());
    let _guard = span.enter();

    // Read both files before touching the session.
    let schema = read_target_schema(&args.target)
        .with_context(|| format!("read target {}", args.target.display()))?;
    let dataset = read_source_dataset(&args.source)
        .with_context(|| format!("read source {}", args.source.display()))?;

    let options = SessionOptions {
        min_export_latency: settings.export.min_latency(),
    };
    let mut session = if args.no_cache || !settings.cache.enabled {
        debug!("mapping cache disabled");
        Session::new(MemoryStore::new(), options)
    } else {
        Session::new(open_file_store(settings, cache_dir)?, options)
    };

    if session.load_target(schema) == RestoreOutcome::Restored {
        println!("Restored the saved mapping for this template.");
    }
    let total_rows = dataset.row_count();
    args.edits.apply_mapping(&mut session, &dataset);
    session.load_source(dataset);
    args.edits.apply_filters(&mut session);

    print_mapping(session.mapping());
    print_filters(session.filters(), session.selected_row_count(), total_rows);

    let job = session.begin_export()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start export runtime")?;
    let table = runtime.block_on(job.run())?;

    if let Some(limit) = args.preview {
        print_preview(&table, limit);
    }
    if args.dry_run {
        println!("Dry run: {} row(s) not written.", table.row_count());
        return Ok(());
    }

    let format = args
        .format
        .map_or(settings.export.format, OutputFormat::from);
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| settings.export.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = write_table(&table, format, &output_dir)
        .with_context(|| format!("write output to {}", output_dir.display()))?;
    info!(path = %path.display(), rows = table.row_count(), "export complete");
    println!("Wrote {} row(s) to {}", table.row_count(), path.display());
    Ok(())
}

pub fn run_cache_show(settings: &Settings, cache_dir: Option<&Path>) -> Result<()> {
    let cache = ConfigCache::new(open_file_store(settings, cache_dir)?);
    match cache.peek().context("read mapping cache")? {
        Some(snapshot) => print_snapshot(&snapshot),
        None => println!("No saved mapping."),
    }
    Ok(())
}

pub fn run_cache_clear(settings: &Settings, cache_dir: Option<&Path>) -> Result<()> {
    let mut cache = ConfigCache::new(open_file_store(settings, cache_dir)?);
    if cache.clear().context("clear mapping cache")? {
        println!("Saved mapping removed.");
    } else {
        println!("No saved mapping.");
    }
    Ok(())
}

fn open_file_store(settings: &Settings, cache_dir: Option<&Path>) -> Result<FileStore> {
    let dir = cache_dir
        .map(Path::to_path_buf)
        .or_else(|| settings.cache.dir.clone())
        .or_else(default_cache_dir)
        .ok_or_else(|| anyhow!("could not determine a cache directory, pass --cache-dir"))?;
    let store = FileStore::new(dir.clone())
        .with_context(|| format!("open mapping cache at {}", dir.display()))?;
    debug!(dir = %store.base_dir().display(), "opened mapping cache");
    Ok(store)
}
