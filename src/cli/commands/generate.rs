//! cli::commands::generate
//!
//! The documentation-generation command: merge catalog documentation into
//! the model, then patch the companion templates.
//!
//! # Ordering
//!
//! 1. Input checks and configuration (fatal before any catalog activity)
//! 2. Load and scan the model (structural errors abort before connecting)
//! 3. Open the catalog connection, resolve every entity/property
//! 4. Save the merged model - the only write, after a fully successful pass
//! 5. Patch companion templates (missing files are informational skips)
//!
//! The catalog connection lives on this function's stack and is dropped on
//! every exit path.
//!
//! # Example
//!
//! ```bash
//! edmxdoc -c "Server=db;Initial Catalog=App;User Id=sa;Password=pw" -i Model.edmx
//!
//! # Write the documented model elsewhere, leave templates alone
//! edmxdoc -c "..." -i Model.edmx -o Documented.edmx --skip-templates
//! ```

use anyhow::{bail, Context, Result};

use crate::catalog::SqlServerMetadataSource;
use crate::cli::Cli;
use crate::core::config;
use crate::model::{self, merge};
use crate::templates;
use crate::ui::output::{self, Verbosity};

/// Run the generate command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn generate(cli: &Cli) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(generate_async(cli))
}

/// Async implementation of generate.
async fn generate_async(cli: &Cli) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    if !cli.input.is_file() {
        bail!("input file '{}' does not exist", cli.input.display());
    }
    let output_path = cli.output_path();

    let options = config::load(cli.input.parent())?;
    output::debug(
        format!(
            "catalog options: schema '{}', property '{}'",
            options.schema, options.property_name
        ),
        verbosity,
    );

    let xml = model::load(&cli.input)?;
    // Scan before connecting: structural errors abort without any catalog
    // activity, and the entity count drives progress reporting.
    let entities = model::scan::scan(&xml)
        .with_context(|| format!("failed to read model '{}'", cli.input.display()))?;
    output::debug(
        format!("model has {} entity nodes", entities.len()),
        verbosity,
    );

    let merged = {
        let source = SqlServerMetadataSource::connect(&cli.connection_string, options)
            .await
            .context("failed to open catalog connection")?;
        let docs = merge::resolve(&entities, &source, verbosity).await?;
        merge::apply(&xml, &docs)?
    };

    model::save(&merged, &output_path)?;
    output::print(
        format!("Wrote documented model to {}", output_path.display()),
        verbosity,
    );

    if cli.skip_templates {
        output::debug("skipping companion templates", verbosity);
    } else {
        templates::patch_companions(&cli.input, verbosity)?;
    }

    output::success("Operation complete", verbosity);
    Ok(())
}
