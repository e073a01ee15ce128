///! Handles session commands typed by the user.
use std::sync::LazyLock;

use anyhow::Result;
use critterdex_common::{parse_month, Species};
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::renderer::TextRenderer;
use super::table::{ColumnKey, FilterValue, GlobalFilterPatch, SortDirection, SortState};
use crate::service::Session;

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/(\S+)\s*(.*)$").expect("command pattern is valid"));

const HELP: &str = "\
/list                      show the table
/filters                   show filter controls
/search <text>             free-text search (empty clears)
/now on|off                only creatures catchable right now
/south on|off              southern hemisphere
/species fish|bug          toggle a species
/location|/shadow|/time <value>   exact-match filters (empty clears)
/month <1-12|name>         available in month (empty clears)
/hidecaught on|off         hide caught creatures
/sort <column> [asc|desc]  sort (empty clears)
/catch <name>  /release <name>  /clearcaught
/import fish|bug <page.html>
/reset                     clear all filters and sorting";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

impl CommandResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    fn err(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

pub struct CommandHandler {
    session: Session,
}

impl CommandHandler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Answer commands line by line until the input ends or the user quits.
    /// Lines that are not valid UTF-8 are rejected without ending the session.
    pub async fn serve<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    tracing::warn!("Rejected input line: {}", e);
                    output.write_all(b"! invalid input\n").await?;
                    output.flush().await?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "/quit" | "/exit" | "/q") {
                break;
            }

            let message = match self.handle_message(line).await {
                Ok(resp) if resp.success => resp.message,
                Ok(resp) => format!("! {}", resp.message),
                Err(e) => {
                    tracing::error!("Command failed: {:#}", e);
                    format!("! {:#}", e)
                }
            };
            output.write_all(message.as_bytes()).await?;
            if !message.ends_with('\n') {
                output.write_all(b"\n").await?;
            }
            output.flush().await?;
        }
        Ok(())
    }

    /// Handle one input line
    pub async fn handle_message(&mut self, content: &str) -> Result<CommandResponse> {
        match parse_command(content) {
            Some((command, args)) => self.router(&command.to_lowercase(), args.trim()).await,
            None => Ok(CommandResponse::err("Commands start with '/', try /help")),
        }
    }

    async fn router(&mut self, command: &str, args: &str) -> Result<CommandResponse> {
        tracing::debug!("Command /{} {:?}", command, args);
        match command {
            "help" | "h" => Ok(CommandResponse::ok(HELP)),
            "list" | "ls" => Ok(self.list().await),
            "filters" => Ok(self.filters()),
            "search" | "s" => {
                let text = (!args.is_empty()).then(|| args.to_string());
                self.session.update_global(GlobalFilterPatch {
                    search_text: Some(text),
                    ..Default::default()
                });
                Ok(self.list().await)
            }
            "now" => self.global_flag(args, |on| GlobalFilterPatch {
                is_available_now: Some(on),
                ..Default::default()
            }).await,
            "south" => self.global_flag(args, |on| GlobalFilterPatch {
                is_southern_hemisphere: Some(on),
                ..Default::default()
            }).await,
            "species" => match args.parse::<Species>() {
                Ok(species) => {
                    self.session.toggle_species(species);
                    Ok(self.list().await)
                }
                Err(e) => Ok(CommandResponse::err(e)),
            },
            "location" => Ok(self.text_filter(ColumnKey::Location, args).await),
            "shadow" => Ok(self.text_filter(ColumnKey::ShadowSize, args).await),
            "time" => Ok(self.text_filter(ColumnKey::Time, args).await),
            "month" => {
                if args.is_empty() {
                    self.session.set_filter(ColumnKey::Months, None);
                    return Ok(self.list().await);
                }
                match parse_month(args) {
                    Some(month) => {
                        self.session.set_filter(ColumnKey::Months, Some(FilterValue::Month(month)));
                        Ok(self.list().await)
                    }
                    None => Ok(CommandResponse::err(format!("Unknown month: {}", args))),
                }
            }
            "hidecaught" => match parse_switch(args) {
                Some(on) => {
                    self.session.set_filter(ColumnKey::Caught, Some(FilterValue::Flag(on)));
                    Ok(self.list().await)
                }
                None => Ok(CommandResponse::err("Usage: /hidecaught on|off")),
            },
            "sort" => Ok(self.sort(args).await),
            "catch" => self.catch(args, true).await,
            "release" => self.catch(args, false).await,
            "clearcaught" => {
                let cleared = self.session.clear_caught().await?;
                Ok(CommandResponse::ok(format!("Cleared {} caught creatures", cleared)))
            }
            "import" => self.import(args).await,
            "reset" => {
                self.session.reset_filters();
                Ok(self.list().await)
            }
            _ => Ok(CommandResponse::err(format!("Unknown command: /{}", command))),
        }
    }

    async fn list(&self) -> CommandResponse {
        let caught = self.session.caught_snapshot().await;
        let view = self.session.visible_rows(&caught);
        let renderer = TextRenderer::new(self.session.engine().columns());
        CommandResponse::ok(renderer.render_table(&view))
    }

    fn filters(&self) -> CommandResponse {
        let renderer = TextRenderer::new(self.session.engine().columns());
        let global = self.session.global_filter();
        let mut message = renderer.render_controls(&self.session.filter_controls());
        message.push_str(&format!(
            "Search [{}] | Available now [{}] | Southern hemisphere [{}]",
            global.search_text.as_deref().unwrap_or(""),
            switch_label(global.is_available_now),
            switch_label(global.is_southern_hemisphere),
        ));
        CommandResponse::ok(message)
    }

    async fn global_flag(
        &mut self,
        args: &str,
        patch: impl FnOnce(bool) -> GlobalFilterPatch,
    ) -> Result<CommandResponse> {
        match parse_switch(args) {
            Some(on) => {
                self.session.update_global(patch(on));
                Ok(self.list().await)
            }
            None => Ok(CommandResponse::err("Expected on or off")),
        }
    }

    async fn text_filter(&mut self, key: ColumnKey, args: &str) -> CommandResponse {
        let value = (!args.is_empty()).then(|| FilterValue::Text(args.to_string()));
        self.session.set_filter(key, value);
        self.list().await
    }

    async fn sort(&mut self, args: &str) -> CommandResponse {
        let mut parts = args.split_whitespace();
        let Some(column) = parts.next() else {
            self.session.set_sort(SortState::default());
            return self.list().await;
        };

        let key = match column.parse::<ColumnKey>() {
            Ok(key) => key,
            Err(e) => return CommandResponse::err(e),
        };
        let direction = match parts.next().map(str::parse::<SortDirection>) {
            None => SortDirection::Ascending,
            Some(Ok(direction)) => direction,
            Some(Err(e)) => return CommandResponse::err(e),
        };

        let sortable = self
            .session
            .engine()
            .columns()
            .iter()
            .any(|c| c.key == key && c.can_sort());
        if !sortable {
            return CommandResponse::err(format!("Column {} cannot be sorted", key));
        }

        self.session.set_sort(SortState::by(key, direction));
        self.list().await
    }

    async fn catch(&mut self, args: &str, caught: bool) -> Result<CommandResponse> {
        if args.is_empty() {
            return Ok(CommandResponse::err("Please provide a creature name. Example: /catch Koi"));
        }

        let Some(name) = self.session.resolve_name(args) else {
            let suggestions = self.session.suggest_names(args);
            let message = if suggestions.is_empty() {
                format!("No creature named {}", args)
            } else {
                format!("No creature named {}. Did you mean: {}?", args, suggestions.join(", "))
            };
            return Ok(CommandResponse::err(message));
        };

        self.session.set_caught(&name, caught).await?;
        let verb = if caught { "Marked" } else { "Unmarked" };
        Ok(CommandResponse::ok(format!("{} {} as caught", verb, name)))
    }

    async fn import(&mut self, args: &str) -> Result<CommandResponse> {
        let Some((species, path)) = args.split_once(char::is_whitespace) else {
            return Ok(CommandResponse::err("Usage: /import fish|bug <page.html>"));
        };
        let species = match species.parse::<Species>() {
            Ok(species) => species,
            Err(e) => return Ok(CommandResponse::err(e)),
        };

        let count = self.session.import(species, path.trim()).await?;
        Ok(CommandResponse::ok(format!("Imported {} {} records", count, species)))
    }
}

/// Split "/command args" into its parts
fn parse_command(content: &str) -> Option<(String, String)> {
    COMMAND_RE.captures(content).map(|caps| {
        let command = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let args = caps.get(2).map_or("", |m| m.as_str()).to_string();
        (command, args)
    })
}

fn parse_switch(args: &str) -> Option<bool> {
    match args.trim().to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn switch_label(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
