//! Terminal front-end: reads commands from stdin and re-renders whenever the
//! visible query state changes.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::types::CustomerId;
use crate::forms::customer::{CustomerForm, FormField};
use crate::models::config::ClientConfig;
use crate::query::{CustomerDetailController, CustomerListController, QueryClient, QuerySnapshot};
use crate::render::Renderer;
use crate::repository::{CustomerReader, CustomerWriter};
use crate::routes::Route;
use crate::search::SearchInput;
use crate::services::customer as customer_service;
use crate::services::errors::GENERIC_FAILURE;
use crate::services::{ServiceError, ServiceResult};
use crate::view::{DetailView, ListView};

const HELP: &str = "\
Commands:
  type <text>     edit the search box (commits after a pause)
  search [text]   commit the search now
  clear           clear the search
  open <id|path>  show a customer, e.g. `open 42` or `open /customer/42`
  add             create a customer
  edit            edit the customer on screen
  delete          delete the customer on screen
  home            back to the list
  refresh         reload the current view
  help            show this help
  quit            exit
";

const FORM_HINT: &str = "Enter keeps the current value, `-` clears it, `.` cancels.\n";

/// Result of feeding one input line to the application.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Quit,
}

struct FormSession {
    target: Option<CustomerId>,
    form: CustomerForm,
    field: usize,
}

impl FormSession {
    fn current(&self) -> Option<FormField> {
        FormField::ALL.get(self.field).copied()
    }

    fn prompt(&self) -> String {
        let Some(field) = self.current() else {
            return String::new();
        };
        let marker = if field.is_required() { "*" } else { "" };
        match self.form.get(field) {
            Some(value) => format!("{}{marker} [{value}]: ", field.label()),
            None => format!("{}{marker}: ", field.label()),
        }
    }
}

enum Mode {
    Browse,
    Form(FormSession),
    ConfirmDelete(CustomerId),
}

/// Owns the controllers and the search box and turns input lines into
/// screen updates.
pub struct App<R> {
    queries: QueryClient<R>,
    list: CustomerListController<R>,
    detail: CustomerDetailController<R>,
    search: SearchInput,
    renderer: Renderer,
    route: Route,
    mode: Mode,
}

impl<R> App<R>
where
    R: CustomerReader + CustomerWriter + 'static,
{
    pub fn new(queries: QueryClient<R>, config: &ClientConfig) -> io::Result<Self> {
        let renderer = Renderer::new()
            .map_err(|e| io::Error::other(format!("Template parsing error(s): {e}")))?;
        let list = CustomerListController::new(queries.clone());
        let detail = CustomerDetailController::new(queries.clone());

        let committer = list.clone();
        let search = SearchInput::new(config.search_debounce(), move |term| {
            let list = committer.clone();
            tokio::spawn(async move { list.fetch(&term).await });
        });

        Ok(Self {
            queries,
            list,
            detail,
            search,
            renderer,
            route: Route::Home,
            mode: Mode::Browse,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Runs until `quit` or end of input.
    pub async fn run<I, W>(mut self, input: I, mut output: W) -> io::Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut list_changes = self.list.subscribe();
        let mut detail_changes = self.detail.subscribe();

        self.search.submit();
        output.write_all(HELP.as_bytes()).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match self.handle(&line).await {
                        Step::Print(text) => output.write_all(text.as_bytes()).await?,
                        Step::Quit => break,
                    }
                }
                Ok(()) = list_changes.changed() => {
                    if self.route == Route::Home && self.is_browsing() {
                        output.write_all(self.screen().as_bytes()).await?;
                    }
                }
                Ok(()) = detail_changes.changed() => {
                    if matches!(self.route, Route::Customer(_)) && self.is_browsing() {
                        output.write_all(self.screen().as_bytes()).await?;
                    }
                }
            }
            output.flush().await?;
        }

        self.search.close();
        Ok(())
    }

    fn is_browsing(&self) -> bool {
        matches!(self.mode, Mode::Browse)
    }

    /// Text of the current page, preceded by a notification when its last
    /// request failed.
    pub fn screen(&self) -> String {
        let (banner, rendered) = match &self.route {
            Route::Home => {
                let snapshot = self.list.snapshot();
                let term = self.list.committed_term().unwrap_or_default();
                let description =
                    (!term.is_empty()).then(|| format!("Nothing matches \"{term}\""));
                let view = ListView::project(&snapshot, description.as_deref());
                (
                    failure_banner(&snapshot),
                    self.renderer.list(self.search.text(), &view),
                )
            }
            Route::Customer(_) => {
                let snapshot = self.detail.snapshot();
                (
                    failure_banner(&snapshot),
                    self.renderer.detail(&DetailView::project(&snapshot)),
                )
            }
            Route::NotFound(path) => (String::new(), Ok(format!("Page not found: {path}\n"))),
        };
        match rendered {
            Ok(body) => format!("{banner}{body}"),
            Err(err) => {
                log::error!("Failed to render page: {err}");
                format!("{GENERIC_FAILURE}\n")
            }
        }
    }

    /// Feeds one input line to the current mode.
    pub async fn handle(&mut self, line: &str) -> Step {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.command(line),
            Mode::Form(session) => self.form_input(session, line).await,
            Mode::ConfirmDelete(id) => self.confirm_delete(id, line).await,
        }
    }

    fn command(&mut self, line: &str) -> Step {
        let line = line.trim_start();
        let (command, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
        match command {
            "" => Step::Print(String::new()),
            "type" => {
                self.search.on_change(rest);
                Step::Print(String::new())
            }
            "search" => {
                if !rest.is_empty() {
                    self.search.on_change(rest);
                }
                self.search.submit();
                self.navigate(Route::Home)
            }
            "clear" => {
                self.search.clear();
                self.navigate(Route::Home)
            }
            "open" => self.open(rest.trim()),
            "home" | "back" => {
                self.spawn_list_refresh();
                self.navigate(Route::Home)
            }
            "refresh" => {
                match &self.route {
                    Route::Home => self.spawn_list_refresh(),
                    Route::Customer(_) => self.spawn_detail_refresh(),
                    Route::NotFound(_) => {}
                }
                Step::Print(String::new())
            }
            "add" => self.start_form(None, CustomerForm::default(), "Add New Customer"),
            "edit" => match self.shown_customer() {
                Some((id, form)) => self.start_form(Some(id), form, "Edit Customer"),
                None => Step::Print("Open a customer first.\n".to_string()),
            },
            "delete" => match self.shown_customer() {
                Some((id, _)) => {
                    self.mode = Mode::ConfirmDelete(id);
                    Step::Print("Are you sure you want to delete this customer? [y/N] ".to_string())
                }
                None => Step::Print("Open a customer first.\n".to_string()),
            },
            "help" => Step::Print(HELP.to_string()),
            "quit" | "exit" => Step::Quit,
            other => Step::Print(format!("Unknown command `{other}`. Type `help`.\n")),
        }
    }

    fn open(&mut self, target: &str) -> Step {
        let route = if target.starts_with('/') {
            Route::parse(target)
        } else {
            match customer_service::parse_customer_id(target) {
                Ok(id) => Route::Customer(id),
                Err(err) => return Step::Print(format!("{}\n", err.notification())),
            }
        };
        if let Route::Customer(id) = &route {
            let detail = self.detail.clone();
            let id = id.clone();
            tokio::spawn(async move { detail.fetch(&id).await });
        }
        self.navigate(route)
    }

    fn navigate(&mut self, route: Route) -> Step {
        log::debug!("navigating to {route}");
        self.route = route;
        Step::Print(self.screen())
    }

    fn spawn_list_refresh(&self) {
        let list = self.list.clone();
        tokio::spawn(async move { list.refresh().await });
    }

    fn spawn_detail_refresh(&self) {
        let detail = self.detail.clone();
        tokio::spawn(async move { detail.refresh().await });
    }

    /// Id and prefilled form of the customer on the detail page, if loaded.
    fn shown_customer(&self) -> Option<(CustomerId, CustomerForm)> {
        if !matches!(self.route, Route::Customer(_)) {
            return None;
        }
        self.detail
            .snapshot()
            .data
            .flatten()
            .map(|customer| (customer.id.clone(), CustomerForm::from(&customer)))
    }

    fn start_form(&mut self, target: Option<CustomerId>, form: CustomerForm, title: &str) -> Step {
        let session = FormSession {
            target,
            form,
            field: 0,
        };
        let text = format!("{title}\n{FORM_HINT}{}", session.prompt());
        self.mode = Mode::Form(session);
        Step::Print(text)
    }

    async fn form_input(&mut self, mut session: FormSession, line: &str) -> Step {
        let value = line.trim();
        if value == "." {
            return Step::Print(format!("Cancelled.\n{}", self.screen()));
        }
        if let Some(field) = session.current() {
            match value {
                "" => {}
                "-" => session.form.set(field, ""),
                value => session.form.set(field, value),
            }
            session.field += 1;
        }
        if session.current().is_some() {
            let prompt = session.prompt();
            self.mode = Mode::Form(session);
            return Step::Print(prompt);
        }

        match self.save(&session).await {
            Ok(message) => Step::Print(format!("{message}\n{}", self.screen())),
            Err(err) => {
                let text = failure_text(&err);
                session.field = first_invalid_field(&err);
                let prompt = session.prompt();
                self.mode = Mode::Form(session);
                Step::Print(format!("{text}{FORM_HINT}{prompt}"))
            }
        }
    }

    async fn save(&mut self, session: &FormSession) -> ServiceResult<String> {
        match &session.target {
            None => {
                customer_service::create_customer(&self.queries, &session.form).await?;
                self.spawn_list_refresh();
                Ok("Customer created successfully".to_string())
            }
            Some(id) => {
                customer_service::update_customer(&self.queries, id, &session.form).await?;
                self.spawn_detail_refresh();
                Ok("Customer updated successfully".to_string())
            }
        }
    }

    async fn confirm_delete(&mut self, id: CustomerId, line: &str) -> Step {
        if !matches!(line.trim(), "y" | "Y" | "yes") {
            return Step::Print("Delete cancelled.\n".to_string());
        }
        match customer_service::delete_customer(&self.queries, &id).await {
            Ok(()) => {
                self.spawn_list_refresh();
                self.route = Route::Home;
                Step::Print(format!("Customer deleted successfully\n{}", self.screen()))
            }
            Err(err) => Step::Print(format!("{}\n", err.notification())),
        }
    }
}

/// Notification line for a settled request that failed, empty otherwise.
fn failure_banner<T>(snapshot: &QuerySnapshot<T>) -> String {
    match &snapshot.error {
        Some(err) if !snapshot.loading => {
            format!("! {}\n", ServiceError::from(err.clone()).notification())
        }
        _ => String::new(),
    }
}

/// Field messages for validation failures, the notification otherwise.
fn failure_text(err: &ServiceError) -> String {
    match err {
        ServiceError::Form(form_err) => FormField::ALL
            .iter()
            .filter_map(|field| {
                form_err
                    .field_messages()
                    .get(field.name())
                    .map(|messages| format!("  {}: {}\n", field.label(), messages.join(", ")))
            })
            .collect(),
        other => format!("{}\n", other.notification()),
    }
}

/// Where to resume the kept draft after a failed save.
fn first_invalid_field(err: &ServiceError) -> usize {
    let ServiceError::Form(form_err) = err else {
        return 0;
    };
    let messages = form_err.field_messages();
    FormField::ALL
        .iter()
        .position(|field| messages.contains_key(field.name()))
        .unwrap_or(0)
}
