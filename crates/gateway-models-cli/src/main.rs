use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{pad_str, truncate_str, Alignment, Key, Style, Term};
use gateway_models_core::{
    api::GatewayClient,
    config::Config,
    filter::{provider_counts, FilterState, ViewMode},
    format::{format_context_length, format_price},
    model::ModelDescriptor,
    provider::format_provider_name,
    session::{Action, Session, ViewState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_free() -> Style   { Style::new().color256(114).bold() }  // green
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_price() -> Style  { Style::new().color256(109) }         // teal
fn s_bold() -> Style   { Style::new().bold() }
fn s_accent() -> Style { Style::new().color256(141) }         // violet accent
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "gateway-models",
    about = "Browse, search and filter the AI models offered by the Kilo gateway",
    version,
    after_help = "examples:\n  \
        gateway-models                          (interactive browser)\n  \
        gateway-models llama                    (search name, id and description)\n  \
        gateway-models --provider openai --view list\n  \
        gateway-models --free --json\n  \
        gateway-models providers\n  \
        gateway-models show anthropic/claude-sonnet-4"
)]
struct Cli {
    /// Case-insensitive search over name, id and description.
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Only models from this provider slug, e.g. openai.
    #[arg(long, short)]
    provider: Option<String>,

    /// Only free models.
    #[arg(long)]
    free: bool,

    /// grid or list.
    #[arg(long)]
    view: Option<ViewMode>,

    #[arg(long, short, global = true)]
    json: bool,

    /// Print once and exit, even on a terminal.
    #[arg(long)]
    no_interactive: bool,

    /// Override the models endpoint.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Config file (default: <config dir>/gateway-models/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List providers with their model counts.
    Providers,
    /// Full details for one model.
    Show {
        /// Model id, e.g. openai/gpt-4o, or a search term.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_default(),
    };
    if let Some(ref endpoint) = cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    tracing::debug!(endpoint = %config.endpoint, revalidate_secs = config.revalidate_secs, "config resolved");
    let client = GatewayClient::from_config(&config)?;

    match cli.command {
        Some(Commands::Providers) => cmd_providers(&client).await?,
        Some(Commands::Show { ref id }) => cmd_show(&client, id, cli.json).await?,
        None => {
            let filter = FilterState {
                search_text: cli.query.clone().unwrap_or_default(),
                selected_provider: cli.provider.clone().unwrap_or_default(),
                free_only: cli.free,
                view_mode: cli.view.unwrap_or(config.view),
            };
            cmd_list(&client, filter, &cli).await?;
        }
    }
    Ok(())
}

// ── Loading ──────────────────────────────────────────────────────────

/// Open a session with a transient "loading..." line on stderr.
async fn load_session(client: &GatewayClient, filter: FilterState) -> anyhow::Result<Session> {
    let term = Term::stderr();
    let mut session = Session::new(filter);
    if term.is_term() {
        term.write_line(&format!("{}", s_dim().apply_to("loading models...")))?;
        client.open(&mut session).await;
        term.clear_last_lines(1)?;
    } else {
        client.open(&mut session).await;
    }
    Ok(session)
}

/// Error out of a one-shot command if the catalog could not be loaded.
/// The message is reported once, by `main`.
fn require_catalog(session: &Session) -> anyhow::Result<()> {
    if let Some(ref message) = session.catalog().error {
        anyhow::bail!("failed to load models: {message}");
    }
    Ok(())
}

// ── List ─────────────────────────────────────────────────────────────

async fn cmd_list(client: &GatewayClient, filter: FilterState, opts: &Cli) -> anyhow::Result<()> {
    let session = load_session(client, filter).await?;

    let interactive = !opts.json
        && !opts.no_interactive
        && Term::stderr().is_term()
        && Term::stdout().is_term();
    if interactive {
        return browse(client, session).await;
    }

    require_catalog(&session)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&session.visible())?);
        return Ok(());
    }

    let width = Term::stdout().size().1 as usize;
    println!();
    for line in header_lines(&session, width) {
        println!("{line}");
    }
    for line in body_lines(&session, width) {
        println!("{line}");
    }
    println!("{}", sep(width.min(64)));
    println!();
    Ok(())
}

// ── Providers ────────────────────────────────────────────────────────

async fn cmd_providers(client: &GatewayClient) -> anyhow::Result<()> {
    let session = load_session(client, FilterState::default()).await?;
    require_catalog(&session)?;

    let counts = provider_counts(&session.catalog().models);

    println!();
    println!("{}", s_header().apply_to("providers"));
    println!("{}", sep(64));

    for (slug, count) in &counts {
        println!(
            "  {:<28} {:<26} {}",
            s_bold().apply_to(slug),
            s_dim().apply_to(format_provider_name(slug)),
            s_label().apply_to(format!("{count} models"))
        );
    }

    println!("{}", sep(64));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} providers   gateway-models --provider <slug> to browse",
            counts.len()
        ))
    );
    println!();
    Ok(())
}

// ── Show ─────────────────────────────────────────────────────────────

async fn cmd_show(client: &GatewayClient, query: &str, json: bool) -> anyhow::Result<()> {
    let mut session = load_session(client, FilterState::default()).await?;
    require_catalog(&session)?;

    // Exact id first, then the first search hit.
    let exact = session.catalog().models.iter().find(|m| m.id == query).cloned();
    let model = match exact {
        Some(m) => m,
        None => {
            session.dispatch(Action::SetSearch(query.to_string()));
            match session.visible().first() {
                Some(m) => (*m).clone(),
                None => {
                    anyhow::bail!(
                        "no model matches '{query}' (try the full model ID, e.g. openai/gpt-4o)"
                    );
                }
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    print_model_full(&model);
    Ok(())
}

fn format_created(ts: i64) -> String {
    if ts == 0 {
        return String::new();
    }
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn print_model_full(m: &ModelDescriptor) {
    let row = |label: &str, value: String| {
        if !value.is_empty() {
            println!("  {:<22} {}", s_label().apply_to(label), value);
        }
    };

    println!();
    println!("{}", s_header().apply_to(&m.name));
    println!("{}", s_dim().apply_to(&m.id));
    println!("{}", sep(64));

    if let Some(ref desc) = m.description {
        for line in wrap(desc, 62, usize::MAX) {
            println!("  {}", s_dim().apply_to(line));
        }
        println!();
    }

    row("provider", format_provider_name(m.provider()));
    row("created", format_created(m.created));
    row("context", format_context_length(m.context_length));
    if let Some(max) = m.top_provider.max_completion_tokens {
        row("max completion", format_context_length(max));
    }
    row("moderated", if m.top_provider.is_moderated { "yes".into() } else { "no".into() });
    row(
        "input",
        m.input_modalities()
            .iter()
            .map(|md| md.label())
            .collect::<Vec<_>>()
            .join(", "),
    );
    row("output", m.architecture.output_modalities.join(", "));
    row("tokenizer", m.architecture.tokenizer.clone().unwrap_or_default());

    println!();
    println!("  {}", s_header().apply_to("pricing (per 1M tokens)"));
    let price = |raw: &str| {
        let p = format_price(raw);
        if p == "Free" {
            s_free().apply_to(p).to_string()
        } else {
            s_price().apply_to(p).to_string()
        }
    };
    row("prompt", price(&m.pricing.prompt));
    row("completion", price(&m.pricing.completion));
    if let Some(ref v) = m.pricing.input_cache_read {
        row("cache read", price(v));
    }
    if let Some(ref v) = m.pricing.internal_reasoning {
        row("reasoning", price(v));
    }
    // Per-request and per-image prices are flat amounts, not per token.
    let flat = |label: &str, raw: &Option<String>| {
        if let Some(v) = raw.as_deref().filter(|v| v.parse::<f64>().map(|f| f != 0.0).unwrap_or(false)) {
            row(label, s_price().apply_to(format!("${v}")).to_string());
        }
    };
    flat("per request", &m.pricing.request);
    flat("per image", &m.pricing.image);
    flat("web search", &m.pricing.web_search);

    if !m.supported_parameters.is_empty() {
        println!();
        println!("  {}", s_header().apply_to("supported parameters"));
        for line in wrap(&m.supported_parameters.join(" "), 62, usize::MAX) {
            println!("  {}", s_dim().apply_to(line));
        }
    }

    println!("{}", sep(64));
    println!();
}

// ── Rendering ────────────────────────────────────────────────────────

const CARD_W: usize = 38;
const GAP: &str = "  ";

fn header_lines(session: &Session, width: usize) -> Vec<String> {
    let f = session.filter();
    let provider = if f.selected_provider.is_empty() {
        "All Providers".to_string()
    } else {
        format_provider_name(&f.selected_provider)
    };
    let search = if f.search_text.is_empty() {
        s_hint().apply_to("none").to_string()
    } else {
        s_bold().apply_to(&f.search_text).to_string()
    };
    let free = if f.free_only {
        s_free().apply_to("free only").to_string()
    } else {
        s_hint().apply_to("all prices").to_string()
    };
    let view = match f.view_mode {
        ViewMode::Grid => "grid",
        ViewMode::List => "list",
    };
    let count = format!(
        "{}/{} models",
        session.visible().len(),
        session.catalog().models.len()
    );

    let lines = vec![
        format!(
            "{}   {}",
            s_header().apply_to("Browse AI Models"),
            s_dim().apply_to(count)
        ),
        format!(
            "  {} {}   {} {}   {}   {} {}",
            s_label().apply_to("search"),
            search,
            s_label().apply_to("provider"),
            s_accent().apply_to(provider),
            free,
            s_label().apply_to("view"),
            s_dim().apply_to(view),
        ),
        sep(width.min(64)),
    ];
    clip_all(lines, width)
}

fn body_lines(session: &Session, width: usize) -> Vec<String> {
    let lines = match session.view_state() {
        ViewState::Loading => vec![s_dim().apply_to("loading models...").to_string()],
        ViewState::Error { message } => vec![
            String::new(),
            s_err().apply_to("  Failed to load models").to_string(),
            s_dim().apply_to(format!("  {message}")).to_string(),
            String::new(),
        ],
        ViewState::Empty { has_filters } => {
            let hint = if has_filters {
                "Try adjusting your search or filter criteria."
            } else {
                "No models are available at this time."
            };
            vec![
                String::new(),
                s_bold().apply_to("  No models found").to_string(),
                s_dim().apply_to(format!("  {hint}")).to_string(),
                String::new(),
            ]
        }
        ViewState::Models { models } => match session.filter().view_mode {
            ViewMode::Grid => grid_lines(&models, width),
            ViewMode::List => list_lines(&models, width),
        },
    };
    clip_all(lines, width)
}

/// Cut a line to `width` columns so it occupies a single terminal row.
fn clip(line: &str, width: usize) -> String {
    truncate_str(line, width.max(1), "\u{2026}").into_owned()
}

fn clip_all(lines: Vec<String>, width: usize) -> Vec<String> {
    lines.iter().map(|l| clip(l, width)).collect()
}

fn fit(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, Some("\u{2026}")).into_owned()
}

/// Greedy word wrap. Overflow past `max_lines` is marked with an ellipsis.
fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut overflow = false;
    for word in text.split_whitespace() {
        if !cur.is_empty() && cur.chars().count() + 1 + word.chars().count() > width {
            if lines.len() + 1 == max_lines {
                overflow = true;
                break;
            }
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        if overflow {
            cur.push_str(" \u{2026}");
        }
        lines.push(cur);
    }
    lines
}

fn badges(m: &ModelDescriptor) -> String {
    let mut parts = vec![s_accent().apply_to(format_provider_name(m.provider())).to_string()];
    if m.is_free() {
        parts.push(s_free().apply_to("FREE").to_string());
    }
    for md in m.input_modalities() {
        parts.push(s_dim().apply_to(md.label()).to_string());
    }
    parts.join(" ")
}

fn card(m: &ModelDescriptor) -> Vec<String> {
    let mut lines = vec![
        fit(&s_bold().apply_to(&m.name).to_string(), CARD_W),
        fit(&badges(m), CARD_W),
    ];

    let mut desc = m
        .description
        .as_deref()
        .map(|d| wrap(d, CARD_W, 2))
        .unwrap_or_default();
    desc.resize(2, String::new());
    for d in desc {
        lines.push(fit(&s_dim().apply_to(d).to_string(), CARD_W));
    }

    let stats = format!(
        "{} {}  {} {}  {} {}",
        s_hint().apply_to("ctx"),
        s_dim().apply_to(format_context_length(m.context_length)),
        s_hint().apply_to("in"),
        s_price().apply_to(format_price(&m.pricing.prompt)),
        s_hint().apply_to("out"),
        s_price().apply_to(format_price(&m.pricing.completion)),
    );
    lines.push(fit(&stats, CARD_W));
    lines.push(fit(&s_hint().apply_to(&m.id).to_string(), CARD_W));
    lines
}

fn grid_lines(models: &[&ModelDescriptor], width: usize) -> Vec<String> {
    let cols = ((width + GAP.len()) / (CARD_W + GAP.len())).max(1);
    let mut out = Vec::new();
    for row in models.chunks(cols) {
        let cards: Vec<Vec<String>> = row.iter().map(|m| card(m)).collect();
        let height = cards.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..height {
            let line = cards
                .iter()
                .map(|c| c.get(i).cloned().unwrap_or_else(|| " ".repeat(CARD_W)))
                .collect::<Vec<_>>()
                .join(GAP);
            out.push(line.trim_end().to_string());
        }
        out.push(String::new());
    }
    out
}

fn list_lines(models: &[&ModelDescriptor], width: usize) -> Vec<String> {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width.min(u16::MAX as usize) as u16);
    table.set_header(vec![
        Cell::new("  Model").fg(Color::AnsiValue(243)),
        Cell::new("Provider").fg(Color::AnsiValue(243)),
        Cell::new("Context").fg(Color::AnsiValue(243)),
        Cell::new("In").fg(Color::AnsiValue(243)),
        Cell::new("Out").fg(Color::AnsiValue(243)),
        Cell::new("ID").fg(Color::AnsiValue(243)),
    ]);

    for m in models {
        let name = if m.is_free() {
            format!("  {} FREE", m.name)
        } else {
            format!("  {}", m.name)
        };
        table.add_row(vec![
            Cell::new(name).fg(Color::AnsiValue(252)),
            Cell::new(format_provider_name(m.provider())).fg(Color::AnsiValue(141)),
            Cell::new(format_context_length(m.context_length)).fg(Color::AnsiValue(248)),
            Cell::new(format_price(&m.pricing.prompt)).fg(Color::AnsiValue(109)),
            Cell::new(format_price(&m.pricing.completion)).fg(Color::AnsiValue(109)),
            Cell::new(&m.id).fg(Color::AnsiValue(243)),
        ]);
    }

    table.to_string().lines().map(String::from).collect()
}

// ── Interactive browser ──────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    Search,
}

fn hint_line(session: &Session, mode: Mode, width: usize) -> String {
    let text = if session.catalog().error.is_some() {
        "  r retry   q quit"
    } else {
        match mode {
            Mode::Search => "  type to search   enter/esc done",
            Mode::Normal => {
                "  / search  tab provider  f free  v view  c clear  j/k scroll  r reload  q quit"
            }
        }
    };
    s_hint().apply_to(clip(text, width)).to_string()
}

async fn read_key() -> anyhow::Result<Key> {
    let t = Term::stderr();
    Ok(tokio::task::spawn_blocking(move || t.read_key()).await??)
}

async fn browse(client: &GatewayClient, mut session: Session) -> anyhow::Result<()> {
    let term = Term::stderr();
    term.hide_cursor()?;
    let result = browse_loop(client, &mut session, &term).await;
    term.show_cursor()?;
    result
}

async fn browse_loop(
    client: &GatewayClient,
    session: &mut Session,
    term: &Term,
) -> anyhow::Result<()> {
    let mut mode = Mode::Normal;
    let mut scroll: usize = 0;
    let mut drawn: usize = 0;

    loop {
        let (rows, cols) = term.size();
        let (rows, cols) = (rows as usize, cols as usize);

        let header = header_lines(session, cols);
        let body = body_lines(session, cols);
        let room = rows.saturating_sub(header.len() + 2).max(1);
        scroll = scroll.min(body.len().saturating_sub(room));

        if drawn > 0 {
            term.clear_last_lines(drawn)?;
        }
        let mut lines = header;
        lines.extend(body.iter().skip(scroll).take(room).cloned());
        lines.push(hint_line(session, mode, cols));
        for line in &lines {
            term.write_line(line)?;
        }
        drawn = lines.len();

        let key = read_key().await?;

        // Error screen: retry or quit, nothing else.
        if session.catalog().error.is_some() {
            match key {
                Key::Char('r') | Key::Enter => {
                    term.clear_last_lines(drawn)?;
                    term.write_line(&clip(&s_dim().apply_to("loading models...").to_string(), cols))?;
                    client.reload(session).await;
                    drawn = 1;
                }
                Key::Char('q') | Key::Escape | Key::CtrlC => break,
                _ => {}
            }
            continue;
        }

        match mode {
            Mode::Search => match key {
                Key::Char(c) if !c.is_control() => {
                    let mut text = session.filter().search_text.clone();
                    text.push(c);
                    session.dispatch(Action::SetSearch(text));
                    scroll = 0;
                }
                Key::Backspace => {
                    let mut text = session.filter().search_text.clone();
                    text.pop();
                    session.dispatch(Action::SetSearch(text));
                    scroll = 0;
                }
                Key::Enter | Key::Escape => mode = Mode::Normal,
                Key::CtrlC => break,
                _ => {}
            },
            Mode::Normal => match key {
                Key::Char('/') => mode = Mode::Search,
                Key::Tab | Key::ArrowRight | Key::Char('l') => {
                    let next = session.cycle_provider(false);
                    session.dispatch(Action::SetProvider(next));
                    scroll = 0;
                }
                Key::BackTab | Key::ArrowLeft | Key::Char('h') => {
                    let prev = session.cycle_provider(true);
                    session.dispatch(Action::SetProvider(prev));
                    scroll = 0;
                }
                Key::Char('f') => {
                    session.dispatch(Action::ToggleFreeOnly);
                    scroll = 0;
                }
                Key::Char('v') => {
                    let view = session.filter().view_mode.toggled();
                    session.dispatch(Action::SetViewMode(view));
                    scroll = 0;
                }
                Key::Char('c') => {
                    session.dispatch(Action::ClearFilters);
                    scroll = 0;
                }
                Key::ArrowDown | Key::Char('j') => scroll += 3,
                Key::ArrowUp | Key::Char('k') => scroll = scroll.saturating_sub(3),
                Key::PageDown => scroll += room,
                Key::PageUp => scroll = scroll.saturating_sub(room),
                Key::Char('r') => {
                    term.clear_last_lines(drawn)?;
                    term.write_line(&clip(&s_dim().apply_to("loading models...").to_string(), cols))?;
                    client.reload(session).await;
                    drawn = 1;
                }
                Key::Char('q') | Key::Escape | Key::CtrlC => break,
                _ => {}
            },
        }
    }

    if drawn > 0 {
        term.clear_last_lines(drawn)?;
    }
    Ok(())
}
