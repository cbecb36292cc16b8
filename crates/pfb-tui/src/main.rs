//! Terminal form for submitting PFB/PFD transactions to a node gateway.
use std::{io, time::Duration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pfb_core::{
    constants::{DEFAULT_PORT, DOCS_URL, NAMESPACE_GENERATOR_URL, NODE_ERROR_HINT},
    Field, Form, Gateway, HttpGateway, Msg, Network, SubmitResponse, Submission,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::*,
    Frame,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug, Clone)]
struct Args {
    /// Network to submit on: mocha, blockspacerace or arabica
    #[arg(long, default_value_t = Network::Mocha)]
    network: Network,
    /// Prefill the node IP address
    #[arg(long, default_value = "")]
    domain: String,
    /// Prefill the gateway port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

/// Which control keyboard input goes to.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    #[default]
    Network,
    Domain,
    Port,
    NamespaceId,
    Data,
    Submit,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Network => Focus::Domain,
            Focus::Domain => Focus::Port,
            Focus::Port => Focus::NamespaceId,
            Focus::NamespaceId => Focus::Data,
            Focus::Data => Focus::Submit,
            Focus::Submit => Focus::Network,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Network => Focus::Submit,
            Focus::Domain => Focus::Network,
            Focus::Port => Focus::Domain,
            Focus::NamespaceId => Focus::Port,
            Focus::Data => Focus::NamespaceId,
            Focus::Submit => Focus::Data,
        }
    }

    fn field(self) -> Option<Field> {
        match self {
            Focus::Domain => Some(Field::Domain),
            Focus::Port => Some(Field::Port),
            Focus::NamespaceId => Some(Field::NamespaceId),
            Focus::Data => Some(Field::Data),
            _ => None,
        }
    }
}

type Settled = Result<SubmitResponse, String>;

struct App<G: Gateway> {
    gateway: G,
    form: Form,
    focus: Focus,
    // text as typed; the form keeps the trimmed value
    domain: String,
    port: String,
    namespace_id: String,
    data: String,
    settled_tx: UnboundedSender<Settled>,
    settled_rx: UnboundedReceiver<Settled>,
}

impl<G: Gateway> App<G> {
    fn new(args: Args, gateway: G) -> Self {
        let (settled_tx, settled_rx) = unbounded_channel();
        let mut app = Self {
            gateway,
            form: Form::new(),
            focus: Focus::default(),
            domain: args.domain.clone(),
            port: args.port.to_string(),
            namespace_id: String::new(),
            data: String::new(),
            settled_tx,
            settled_rx,
        };
        app.dispatch(Msg::SetNetwork(args.network));
        app.dispatch(Msg::Edit(Field::Domain, args.domain));
        app.dispatch(Msg::Edit(Field::Port, app.port.clone()));
        app
    }

    fn input(&self, field: Field) -> &str {
        match field {
            Field::Domain => &self.domain,
            Field::Port => &self.port,
            Field::NamespaceId => &self.namespace_id,
            Field::Data => &self.data,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Domain => &mut self.domain,
            Field::Port => &mut self.port,
            Field::NamespaceId => &mut self.namespace_id,
            Field::Data => &mut self.data,
        }
    }

    /// Feed a message to the form and send off any request it hands back.
    fn dispatch(&mut self, msg: Msg) {
        let Some(out) = self.form.update(msg) else {
            return;
        };
        let gateway = self.gateway.clone();
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .submit(&out.url, &out.body)
                .await
                .map_err(|e| e.to_string());
            // receiver is gone only if the app has quit
            let _ = tx.send(result);
        });
    }

    /// Apply outcomes of requests that finished since the last frame.
    fn poll_settled(&mut self) {
        while let Ok(result) = self.settled_rx.try_recv() {
            debug!(ok = result.is_ok(), "submission settled");
            self.dispatch(Msg::Settled(result));
        }
    }

    fn edit(&mut self, field: Field, change: impl FnOnce(&mut String)) {
        if self.form.is_sending() {
            return;
        }
        change(self.input_mut(field));
        let raw = self.input(field).to_string();
        self.dispatch(Msg::Edit(field, raw));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // tracing
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    // terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(args, HttpGateway::new());
    let res = run_app(&mut terminal, &mut app).await;

    // restore
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend, G: Gateway>(terminal: &mut Terminal<B>, app: &mut App<G>) -> Result<()> {
    loop {
        app.poll_settled();
        terminal.draw(|f| ui(f, app))?;

        if crossterm::event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if handle_key(app, key).await? {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn handle_key<G: Gateway>(app: &mut App<G>, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Ok(true),
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.previous(),
        KeyCode::Enter => app.dispatch(Msg::Submit),
        KeyCode::Left if app.focus == Focus::Network => {
            let network = app.form.network().previous();
            app.dispatch(Msg::SetNetwork(network));
        }
        KeyCode::Right if app.focus == Focus::Network => {
            let network = app.form.network().next();
            app.dispatch(Msg::SetNetwork(network));
        }
        KeyCode::Char(c) if !c.is_control() => {
            if let Some(field) = app.focus.field() {
                app.edit(field, |s| s.push(c));
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.focus.field() {
                app.edit(field, |s| {
                    s.pop();
                });
            }
        }
        _ => {}
    }
    Ok(false)
}

fn ui<G: Gateway>(f: &mut Frame, app: &App<G>) {
    let size = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(size);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    render_about(f, cols[0], &app.form);
    render_form(f, cols[1], app);

    // Footer
    let help = Paragraph::new(
        "ESC quit • TAB/↓ next field • Shift-TAB/↑ previous field • ←/→ change network • Enter submit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("help"));
    f.render_widget(help, rows[1]);
}

fn render_about(f: &mut Frame, area: Rect, form: &Form) {
    let kind = form.tx_kind();
    let code = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled(
            form.heading(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "When running a Celestia node, you will need to use the following flags when starting your node to submit a {kind}:"
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("• the "),
            Span::styled("--core.ip string", code),
            Span::raw(" flag, to allow you to submit transactions to your node"),
        ]),
        Line::from(vec![
            Span::raw("• the "),
            Span::styled("--gateway", code),
            Span::raw(", "),
            Span::styled("--gateway.addr string", code),
            Span::raw(", and "),
            Span::styled("--gateway.port string", code),
            Span::raw(format!(
                " flags, to open the gateway and allow anyone to use your IP as an endpoint to submit {kind}s"
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Generate your namespace ID and Data:",
            Style::default().fg(Color::Magenta),
        )),
        Line::from(NAMESPACE_GENERATOR_URL),
        Line::from(""),
        Line::from(Span::styled("Read the docs:", Style::default().fg(Color::Magenta))),
        Line::from(DOCS_URL),
    ];
    let about = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("pfb-tui").borders(Borders::ALL));
    f.render_widget(about, area);
}

fn render_form<G: Gateway>(f: &mut Frame, area: Rect, app: &App<G>) {
    let form = &app.form;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let network = Line::from(
        Network::ALL
            .iter()
            .flat_map(|n| {
                let style = if *n == form.network() {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                [Span::styled(format!(" {} ", n.label()), style), Span::raw(" ")]
            })
            .collect::<Vec<_>>(),
    );
    let selector = Paragraph::new(network).block(input_block("Network", app, Focus::Network));
    f.render_widget(selector, chunks[0]);

    let node_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(chunks[1]);
    render_input(f, node_row[0], app, Focus::Domain);
    render_input(f, node_row[1], app, Focus::Port);

    let payload_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_input(f, payload_row[0], app, Focus::NamespaceId);
    render_input(f, payload_row[1], app, Focus::Data);

    render_outcome(f, chunks[3], form.submission());

    let button_style = if form.can_submit() {
        Style::default().fg(Color::White).bg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Span::styled(format!(" {} ", form.submit_label()), button_style))
        .alignment(Alignment::Right)
        .block(input_block("", app, Focus::Submit));
    f.render_widget(button, chunks[4]);
}

fn input_block<'a, G: Gateway>(title: &'a str, app: &App<G>, focus: Focus) -> Block<'a> {
    let border = if app.form.is_sending() {
        Style::default().fg(Color::DarkGray)
    } else if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

fn render_input<G: Gateway>(f: &mut Frame, area: Rect, app: &App<G>, focus: Focus) {
    let Some(field) = focus.field() else {
        return;
    };
    let mut lines = vec![Line::from(app.input(field).to_string())];
    if let Some(help) = field.help() {
        lines.push(Line::from(Span::styled(
            help,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    let input = Paragraph::new(lines).block(input_block(field.label(), app, focus));
    f.render_widget(input, area);
}

fn render_outcome(f: &mut Frame, area: Rect, submission: &Submission) {
    let panel = if let Some(message) = submission.error() {
        Paragraph::new(vec![
            Line::from(Span::styled(
                message.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(NODE_ERROR_HINT),
        ])
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"))
    } else if let Some((height, tx_hash)) = submission.result() {
        Paragraph::new(vec![
            Line::from(Span::styled("Success!", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("Height: {height}")),
            Line::from(format!("Hash  : {tx_hash}")),
        ])
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Result"))
    } else {
        Paragraph::new("")
    };
    f.render_widget(panel, area);
}
