use anyhow::{Context, Result};
use keyword_core::{DirectoryMonitor, ScoredDocument, TfIdfIndex};
use std::io;

pub mod config;
pub mod report;

use config::MonitorConfig;

/// One scoring engine fed by one directory monitor.
pub struct Monitor {
    config: MonitorConfig,
    index: TfIdfIndex,
    directory: DirectoryMonitor,
}

impl Monitor {
    /// Register the vocabulary and start watching the configured directory.
    pub fn build(config: MonitorConfig) -> Result<Self> {
        let mut index = TfIdfIndex::new();
        tracing::trace!(terms = config.terms.len(), "processing terms");
        for term in &config.terms {
            index.add_term(term)?;
        }
        let directory = DirectoryMonitor::configure(&config.directory)
            .with_context(|| format!("cannot monitor {}", config.directory.display()))?;

        tracing::debug!(
            directory = %config.directory.display(),
            period_s = config.period.as_secs(),
            results = config.results,
            "configuration finished"
        );
        Ok(Self { config, index, directory })
    }

    /// Register valid files: every current one when `all`, otherwise only
    /// those created since the last check. Returns whether anything new was
    /// registered.
    pub fn check_files(&mut self, all: bool) -> bool {
        let paths = if all {
            self.directory.list_current_valid_entries()
        } else {
            self.directory.list_new_valid_entries()
        };

        let mut registered = false;
        for path in paths {
            match self.index.add_file(&path) {
                Ok(()) => registered = true,
                Err(err) => tracing::error!(path = %path.display(), error = %err, "error registering new file"),
            }
        }
        registered
    }

    /// Current ranking, recomputed only when `update` is set.
    pub fn results(&mut self, update: bool) -> &[ScoredDocument] {
        self.index.compute_results(update, self.config.results)
    }

    pub fn index(&self) -> &TfIdfIndex { &self.index }

    pub fn config(&self) -> &MonitorConfig { &self.config }

    /// Report the current ranking in the configured format.
    pub fn report(&mut self, update: bool) -> Result<()> {
        let format = self.config.format;
        let total = self.index.num_docs();
        let results = self.results(update);
        report::emit(&mut io::stdout().lock(), format, results, total)
    }

    /// Scan, report, wait, repeat. Stops after the current cycle on Ctrl-C.
    pub async fn run(mut self) -> Result<()> {
        let mut updated = self.check_files(true);
        loop {
            self.report(updated)?;

            tracing::trace!(period_s = self.config.period.as_secs(), "sleeping");
            tokio::select! {
                _ = tokio::time::sleep(self.config.period) => {}
                res = tokio::signal::ctrl_c() => match res {
                    Ok(()) => {
                        tracing::info!("interrupted, stopping");
                        break;
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "error listening for interrupt");
                        tokio::time::sleep(self.config.period).await;
                    }
                },
            }

            updated = self.check_files(false);
        }
        Ok(())
    }
}
