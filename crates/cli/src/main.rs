// FormGrid CLI - headless template operations

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use formgrid_engine::address::cell_address;
use formgrid_engine::sheet::Sheet;
use formgrid_io::{from_template, load_template, save_template, to_template};
use formgrid_protocol::TemplateDoc;
use formgrid_store_client::{delete_auth, save_auth, AuthCredentials, StoreClient};

use exit_codes::{EXIT_ERROR, EXIT_INVALID_TEMPLATE, EXIT_STORE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "fgrid")]
#[command(about = "Form template grid operations (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a blank template file
    #[command(after_help = "\
Examples:
  fgrid new case-form.json
  fgrid new handover.json --rows 60 --cols 20")]
    New {
        /// Output file
        file: PathBuf,

        /// Number of rows
        #[arg(long, default_value_t = 100)]
        rows: u32,

        /// Number of columns
        #[arg(long, default_value_t = 30)]
        cols: u32,
    },

    /// Summarize a template file
    #[command(after_help = "\
Examples:
  fgrid inspect case-form.json
  fgrid inspect case-form.json --cells")]
    Inspect {
        /// Template file
        file: PathBuf,

        /// List populated cells as ADDRESS: value
        #[arg(long)]
        cells: bool,
    },

    /// Check that a template file loads cleanly
    Validate {
        /// Template file
        file: PathBuf,
    },

    /// List templates on the storage service
    List,

    /// Download a template from the storage service
    #[command(after_help = "\
Examples:
  fgrid fetch 4f1c2d -o case-form.json")]
    Fetch {
        /// Template id
        id: String,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Upload a template file to the storage service
    #[command(after_help = "\
Examples:
  fgrid push case-form.json 4f1c2d
  fgrid push case-form.json --create --name \"Case Form\"")]
    Push {
        /// Template file
        file: PathBuf,

        /// Template id (omit with --create)
        id: Option<String>,

        /// Create a new template instead of replacing one
        #[arg(long)]
        create: bool,

        /// Name for the new template (with --create)
        #[arg(long)]
        name: Option<String>,
    },

    /// Save storage service credentials
    Login {
        /// API base URL (e.g., https://ops.example.com)
        #[arg(long, env = "FORMGRID_API_BASE")]
        api_base: String,

        /// Bearer token
        #[arg(long, env = "FORMGRID_TOKEN")]
        token: String,
    },

    /// Remove saved credentials
    Logout,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::New { file, rows, cols } => cmd_new(&file, rows, cols),
        Commands::Inspect { file, cells } => cmd_inspect(&file, cells),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::List => cmd_list(),
        Commands::Fetch { id, output } => cmd_fetch(&id, &output),
        Commands::Push {
            file,
            id,
            create,
            name,
        } => cmd_push(id.as_deref(), &file, create, name.as_deref()),
        Commands::Login { api_base, token } => cmd_login(api_base, token),
        Commands::Logout => cmd_logout(),
    };

    ExitCode::from(code)
}

fn cmd_new(file: &PathBuf, rows: u32, cols: u32) -> u8 {
    if rows == 0 || cols == 0 {
        eprintln!("error: template needs at least one row and one column");
        return EXIT_USAGE;
    }
    let doc = to_template(&Sheet::new(rows as usize, cols as usize));
    match save_template(file, &doc) {
        Ok(()) => {
            println!("Created {} ({} x {})", file.display(), rows, cols);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_inspect(file: &PathBuf, cells: bool) -> u8 {
    let doc = match load_template(file) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_USAGE;
        }
    };

    for line in summary_lines(&doc) {
        println!("{}", line);
    }

    if cells {
        let sheet = match from_template(&doc) {
            Ok(sheet) => sheet,
            Err(e) => {
                eprintln!("error: {}", e);
                return EXIT_INVALID_TEMPLATE;
            }
        };
        let mut populated: Vec<_> = sheet.cells_iter().collect();
        populated.sort_by_key(|(&pos, _)| pos);
        for (&(row, col), cell) in populated {
            println!("  {}: {}", cell_address(row, col), cell.value);
        }
    }

    EXIT_SUCCESS
}

fn cmd_validate(file: &PathBuf) -> u8 {
    let doc = match load_template(file) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_USAGE;
        }
    };
    match from_template(&doc) {
        Ok(_) => {
            println!("{}: OK", file.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("{}: INVALID: {}", file.display(), e);
            EXIT_INVALID_TEMPLATE
        }
    }
}

fn cmd_list() -> u8 {
    let client = match StoreClient::from_saved_auth() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_STORE;
        }
    };
    match client.list_templates() {
        Ok(templates) => {
            for t in templates {
                let marker = if t.is_default { " (default)" } else { "" };
                println!("{}  {}{}", t.id, t.name, marker);
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_STORE
        }
    }
}

fn cmd_fetch(id: &str, output: &PathBuf) -> u8 {
    let client = match StoreClient::from_saved_auth() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_STORE;
        }
    };
    let doc = match client.fetch_template(id) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_STORE;
        }
    };
    match save_template(output, &doc) {
        Ok(()) => {
            println!("Fetched {} -> {}", id, output.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_push(id: Option<&str>, file: &PathBuf, create: bool, name: Option<&str>) -> u8 {
    let doc = match load_template(file) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_USAGE;
        }
    };
    // Refuse to push a template the engine itself cannot load
    if let Err(e) = from_template(&doc) {
        eprintln!("{}: INVALID: {}", file.display(), e);
        return EXIT_INVALID_TEMPLATE;
    }

    let client = match StoreClient::from_saved_auth() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_STORE;
        }
    };

    if create {
        let Some(name) = name else {
            eprintln!("error: --create requires --name");
            return EXIT_USAGE;
        };
        match client.create_template(name, &doc) {
            Ok(new_id) => {
                println!("Created template {}", new_id);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                EXIT_STORE
            }
        }
    } else {
        let Some(id) = id else {
            eprintln!("error: provide a template id, or use --create");
            return EXIT_USAGE;
        };
        match client.update_template(id, &doc) {
            Ok(()) => {
                println!("Pushed {} -> {}", file.display(), id);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                EXIT_STORE
            }
        }
    }
}

fn cmd_login(api_base: String, token: String) -> u8 {
    match save_auth(&AuthCredentials::new(token, api_base)) {
        Ok(()) => {
            println!("Credentials saved");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_logout() -> u8 {
    match delete_auth() {
        Ok(()) => {
            println!("Credentials removed");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

/// Human-readable template summary.
fn summary_lines(doc: &TemplateDoc) -> Vec<String> {
    let mut lines = vec![
        format!("Grid:      {} rows x {} columns", doc.max_row, doc.max_column),
        format!("Cells:     {} populated", doc.cells.len()),
        format!("Merges:    {}", doc.merged_cells.len()),
        format!(
            "Sizing:    {} row heights, {} column widths",
            doc.row_heights.len(),
            doc.column_widths.len()
        ),
    ];
    if !doc.data_mappings.is_empty() {
        lines.push(format!("Mappings:  {}", doc.data_mappings.len()));
        for (field, address) in &doc.data_mappings {
            lines.push(format!("  {} -> {}", field, address));
        }
    }
    lines
}
