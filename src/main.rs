use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use xoso_lookup::api::LotteryApi;
use xoso_lookup::config;
use xoso_lookup::lookup::{Lookup, LookupRequest, Verdict};
use xoso_lookup::provinces::{self, PROVINCES};
use xoso_lookup::reports::render_text_table;
use xoso_lookup::suggestion::{TicketForm, validate_reading};
use xoso_lookup::ticket_reader::{TicketImage, TicketReader, TicketReaderClient, mime_type_for_extension};
use xoso_lookup::utils::{format_iso_date, parse_iso_date, weekday_label_vi};
use xoso_lookup::LookupError;

#[derive(Parser)]
#[command(name = "xoso-lookup")]
#[command(about = "Check a southern Vietnamese lottery ticket against published results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List provinces, optionally only those drawing on a date
    Provinces {
        /// Date in YYYY-MM-DD format
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Check a ticket number against one draw
    Check {
        /// Province code (see `provinces`)
        #[arg(short, long)]
        province: String,

        /// Draw date in YYYY-MM-DD format
        #[arg(short, long)]
        date: String,

        /// Ticket number, 2 to 6 digits
        #[arg(short, long)]
        number: String,
    },

    /// Read a ticket photo and suggest province, date and number
    ReadTicket {
        #[arg(required = true)]
        image: PathBuf,

        /// Image mime type (guessed from the extension by default)
        #[arg(long)]
        mime_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()?;

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match cli.command {
        Commands::Provinces { date } => list_provinces(date.as_deref()),
        Commands::Check {
            province,
            date,
            number,
        } => {
            let lookup = Lookup::new(LotteryApi::from_config(&config)?);
            check_ticket(&lookup, LookupRequest::new(province, date, number)).await
        }
        Commands::ReadTicket { image, mime_type } => {
            let reader = TicketReaderClient::from_config(&config)?;
            read_ticket(&reader, &image, mime_type).await
        }
    }
}

fn list_provinces(date: Option<&str>) -> Result<()> {
    let Some(raw) = date else {
        println!("📍 {} provinces:", PROVINCES.len());
        for province in PROVINCES.iter() {
            let days: Vec<&str> = province.days.iter().map(|d| weekday_label_vi(*d)).collect();
            println!("   {:<6} {:<20} {}", province.code, province.name, days.join(", "));
        }
        return Ok(());
    };

    let date = parse_iso_date(raw).with_context(|| format!("date must be YYYY-MM-DD, got {}", raw))?;
    let drawing = provinces::provinces_drawing_on(date);
    if drawing.is_empty() {
        println!("⚠ No province draws on {}", raw);
    } else {
        println!("📍 Drawing on {} ({}):", raw, weekday_label_vi(date.weekday()));
        for province in drawing {
            println!("   {:<6} {}", province.code, province.name);
        }
    }
    Ok(())
}

async fn check_ticket(lookup: &Lookup<LotteryApi>, request: LookupRequest) -> Result<()> {
    println!(
        "🔍 Checking {} for {} on {}...",
        request.ticket_number, request.province_code, request.draw_date
    );

    match lookup.run(&request).await {
        Ok(outcome) => {
            match &outcome.verdict {
                Verdict::Won(result) => println!(
                    "🎉 Ticket {} won the {} ({}) with {}!",
                    result.user_number, result.prize_name, result.prize_value, result.matched_number
                ),
                Verdict::NotWon => println!("😔 Ticket {} did not win.", outcome.ticket_number),
            }
            println!("\n📋 Results for {} on {}:", outcome.province_name, outcome.turn_num);
            print!("{}", render_text_table(&outcome.prizes, &outcome.ticket_number));
            Ok(())
        }
        Err(e @ LookupError::NoDrawFound { .. }) => {
            println!("⚠ {}", e);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            Err(e.into())
        }
    }
}

async fn read_ticket<R: TicketReader>(reader: &R, path: &Path, mime_type: Option<String>) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = mime_type.unwrap_or_else(|| {
        mime_type_for_extension(path.extension().and_then(|e| e.to_str())).to_string()
    });
    let image = TicketImage::new(bytes, mime_type);

    let reading = reader.read_ticket(&image, &provinces::province_names()).await?;
    let suggestion = validate_reading(&reading, Local::now().date_naive());

    if suggestion.is_empty() {
        println!("⚠ Nothing could be recognised on the ticket. Please try a clearer photo.");
        return Ok(());
    }

    println!("🎟️ Recognised from the photo (please double-check):");
    for note in &suggestion.notes {
        println!("   • {}", note);
    }

    let mut form = TicketForm::default();
    form.merge(&suggestion);
    if let Ok(request) = form.to_request() {
        println!(
            "\n👉 xoso-lookup check --province {} --date {} --number {}",
            request.province_code, request.draw_date, request.ticket_number
        );
    } else if let Some(date) = form.draw_date {
        println!("\n👉 Provinces drawing that day: xoso-lookup provinces --date {}", format_iso_date(date));
    }
    Ok(())
}
