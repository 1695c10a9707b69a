use anyhow::Context;
use clap::Parser;
use std::fmt::Display;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use wisata::{
    sdk::config::Config,
    sdk::pois::load_pois,
    sdk::routing::{NominatimGeocoder, OsrmProvider},
    sdk::session::{Session, SessionError},
    sdk::util::{log::init_logging, rate_limit::per_second_limiter},
    sdk::view,
    OnTheWay,
};

/// Find tourist attractions near an address and chain stops along the way
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// POI collection: a GeoJSON or CSV file, or an http(s) URL
    #[arg(long)]
    pois: Option<String>,

    /// Number of attractions to list
    #[arg(long)]
    top_k: Option<usize>,

    /// Straight-line candidates checked for driving time
    #[arg(long)]
    prefilter: Option<usize>,

    /// Maximum bearing difference in degrees for "on the way" suggestions
    #[arg(long)]
    tolerance: Option<f64>,

    /// Search once for this address, print the ranking and exit
    #[arg(short, long)]
    address: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(pois) = &self.pois {
            config.poi_source = pois.clone();
        }
        if let Some(k) = self.top_k {
            config.rank.top_k = k;
        }
        if let Some(n) = self.prefilter {
            config.rank.prefilter = n;
        }
        if let Some(deg) = self.tolerance {
            config.corridor.tolerance_deg = deg;
        }
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Go(usize),
    Marker(usize),
    Next(usize),
    Markers,
    Route,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  search <address>  find attractions near an address
  go <n>            drive to the n-th nearest attraction
  marker <n>        drive to the n-th marker
  markers           list all markers around your location
  next <n>          add the n-th \"on the way\" attraction as the next stop
  route             show the whole trip
  help              show this help
  quit              leave";

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let position = || -> Result<usize, String> {
        match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("Expected a list number after \"{word}\"")),
        }
    };

    match word.to_ascii_lowercase().as_str() {
        "search" | "s" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
        "search" | "s" => Err("Expected an address after \"search\"".to_string()),
        "go" | "g" => position().map(Command::Go),
        "marker" | "m" => position().map(Command::Marker),
        "next" | "n" => position().map(Command::Next),
        "markers" => Ok(Command::Markers),
        "route" | "r" => Ok(Command::Route),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(format!("Unknown command \"{word}\". Type \"help\" for a list.")),
    }
}

fn notify(message: impl Display) {
    log::warn!("{}", message);
    eprintln!("! {}", message);
}

struct App {
    session: Session,
    geocoder: NominatimGeocoder,
    router: OsrmProvider,
}

impl App {
    async fn search(&mut self, address: &str) {
        println!("Searching for \"{}\"...", address);
        match self
            .session
            .search(address, &self.geocoder, &self.router)
            .await
        {
            Ok(true) => {
                if let Some(origin) = self.session.origin() {
                    println!("{}", view::origin(origin));
                }
                println!("{}", view::ranking(self.session.ranking()));
            }
            Ok(false) => log::debug!("Search for \"{}\" was superseded", address),
            Err(err) => notify(err),
        }
    }

    async fn after_selection(&self, result: Result<Vec<OnTheWay>, SessionError>) {
        match result {
            Ok(suggestions) => {
                self.show_route().await;
                println!("{}", view::on_the_way(&suggestions));
            }
            Err(err) => notify(err),
        }
    }

    async fn show_route(&self) {
        match self.session.route(&self.router).await {
            Ok(summary) => println!("{}", view::route(&summary)),
            Err(err) => notify(err),
        }
    }

    /// Returns `false` once the user wants to leave.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Search(address) => self.search(&address).await,
            Command::Go(nth) => {
                let result = self.session.choose_destination(nth).map(<[_]>::to_vec);
                self.after_selection(result).await;
            }
            Command::Marker(nth) => {
                let result = self.session.choose_marker(nth).map(<[_]>::to_vec);
                self.after_selection(result).await;
            }
            Command::Next(nth) => {
                let result = self.session.add_stop(nth).map(<[_]>::to_vec);
                self.after_selection(result).await;
            }
            Command::Markers => println!("{}", view::markers(self.session.ranking())),
            Command::Route => self.show_route().await,
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        true
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    let client = config.http_client()?;
    let pois = load_pois(&config.poi_source, &client)
        .await
        .with_context(|| format!("Failed to load tourism data from {}", config.poi_source))?;

    let geocoder = NominatimGeocoder::new(
        client.clone(),
        config.geocoder_url.as_str(),
        per_second_limiter(config.geocoder_rps),
    );
    let router = OsrmProvider::new(
        client,
        config.router_url.as_str(),
        per_second_limiter(config.router_rps),
    );
    let mut app = App {
        session: Session::new(pois, config.rank, config.corridor),
        geocoder,
        router,
    };

    if let Some(address) = cli.address {
        app.search(&address).await;
        return Ok(());
    }

    println!("{}", HELP);
    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !app.handle(command).await {
                    break;
                }
            }
            Err(message) => notify(message),
        }
    }
    Ok(())
}
