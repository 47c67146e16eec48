use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    list_view::{PageNavigation, PageSize, SortColumn},
    Dashboard, HttpIncidentStore, IncidentForm, DEFAULT_SERVER_URL,
};
use shared::domain::IncidentId;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Browse and manage security incidents")]
struct Cli {
    /// Base URL of the incident API.
    #[arg(long, env = "INCIDENT_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of incidents.
    List {
        /// Column click to replay, in order; repeat to cycle direction.
        #[arg(long = "sort", value_name = "COLUMN")]
        sort: Vec<SortColumn>,
        #[arg(long, value_parser = parse_page_size, default_value = "10")]
        page_size: PageSize,
        #[arg(long, conflicts_with = "last")]
        page: Option<usize>,
        #[arg(long)]
        last: bool,
    },
    Show {
        id: i64,
    },
    Create(IncidentFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: IncidentFields,
    },
    Delete {
        id: i64,
    },
    /// Check that the incident service and its database respond.
    Health,
}

#[derive(Args, Debug)]
struct IncidentFields {
    /// When it happened, `YYYY-MM-DDTHH:MM` (UTC).
    #[arg(long)]
    timestamp: Option<String>,
    #[arg(long)]
    source_ip: Option<String>,
    #[arg(long)]
    severity: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl IncidentFields {
    fn apply(self, form: &mut IncidentForm) {
        let IncidentFields {
            timestamp,
            source_ip,
            severity,
            kind,
            status,
            description,
        } = self;
        for (value, slot) in [
            (timestamp, &mut form.timestamp),
            (source_ip, &mut form.source_ip),
            (severity, &mut form.severity),
            (kind, &mut form.kind),
            (status, &mut form.status),
            (description, &mut form.description),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    PageSize::try_from(size)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = HttpIncidentStore::new(&cli.server_url)?;
    let mut dashboard = Dashboard::new(store);

    match cli.command {
        Command::List {
            sort,
            page_size,
            page,
            last,
        } => {
            dashboard
                .refresh()
                .await
                .context("failed to load incidents")?;
            dashboard.set_page_size(page_size);
            for column in sort {
                dashboard.click_column(column);
            }
            if last {
                dashboard.navigate(PageNavigation::Last);
            } else if let Some(page) = page {
                dashboard.go_to_page(page);
            }
            print!("{}", render::render_list(dashboard.view()));
        }
        Command::Show { id } => {
            let incident = dashboard
                .get(IncidentId(id))
                .await
                .with_context(|| format!("failed to load incident {id}"))?;
            print!("{}", render::render_incident(&incident));
        }
        Command::Create(fields) => {
            let mut form = IncidentForm::default();
            fields.apply(&mut form);
            let created = dashboard
                .create(&form)
                .await
                .context("failed to create incident")?;
            println!("Incident created successfully");
            print!("{}", render::render_incident(&created));
        }
        Command::Update { id, fields } => {
            let existing = dashboard
                .get(IncidentId(id))
                .await
                .with_context(|| format!("failed to load incident {id}"))?;
            let mut form = IncidentForm::from_incident(&existing);
            fields.apply(&mut form);
            let updated = dashboard
                .update(IncidentId(id), &form)
                .await
                .context("failed to update incident")?;
            println!("Incident updated successfully");
            print!("{}", render::render_incident(&updated));
        }
        Command::Delete { id } => {
            dashboard
                .delete(IncidentId(id))
                .await
                .with_context(|| format!("failed to delete incident {id}"))?;
            println!("Incident deleted successfully");
            if let Some(message) = dashboard.last_error() {
                println!("warning: list not refreshed: {message}");
            }
        }
        Command::Health => {
            let health = dashboard
                .store()
                .health()
                .await
                .context("incident service is unavailable")?;
            print!("{}", render::render_health(&health));
        }
    }

    Ok(())
}
