//! Perpus - Digital Library terminal client
//!
//! Each subcommand stands in for one screen of the library web app.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perpus_client::{
    config::{AppConfig, LoggingConfig},
    error::{AppResult, FATAL_ERROR_MESSAGE},
    models::BookForm,
    services::forms::{FormFlow, LoginForm, RegisterForm},
    views::{render, DashboardView},
    AppState,
};

/// Books shown on the landing screen
const HOME_PREVIEW: usize = 5;

#[derive(Parser)]
#[command(name = "perpus", version, about = "Perpustakaan digital - klien terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Landing page with a catalog preview
    Home,
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new member account
    Register(RegisterArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Menu and book catalog for the current role
    Dashboard {
        /// Filter by title, author or ISBN
        #[arg(long)]
        search: Option<String>,
        /// Filter by category id
        #[arg(long)]
        category: Option<i64>,
    },
    /// List book categories
    Categories,
    /// Book details and admin management
    Book {
        #[command(subcommand)]
        action: BookCommand,
    },
    /// Borrow a book (member)
    Borrow { book_id: i64 },
    /// List borrowings: your own as a member, all as an admin
    Borrowings,
    /// Record a returned book (admin)
    Return { borrowing_id: i64 },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Student number; non-digits are dropped and it is cut to 7 digits
    #[arg(long)]
    nis: String,
    #[arg(long)]
    major: String,
    #[arg(long)]
    grade: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
}

#[derive(Subcommand)]
enum BookCommand {
    Show { id: i64 },
    Add(BookArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: BookEditArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    category: i64,
    #[arg(long, default_value_t = 1)]
    stock: i32,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cover: Option<String>,
}

#[derive(Args)]
struct BookEditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long)]
    stock: Option<i32>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cover: Option<String>,
}

impl From<BookArgs> for BookForm {
    fn from(args: BookArgs) -> Self {
        BookForm {
            title: args.title,
            author: args.author,
            description: args.description,
            category_id: args.category,
            stock: args.stock,
            published_year: args.year,
            isbn: args.isbn,
            cover: args.cover,
        }
    }
}

impl BookEditArgs {
    fn apply(self, form: &mut BookForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(author) = self.author {
            form.author = author;
        }
        if let Some(category) = self.category {
            form.category_id = category;
        }
        if let Some(stock) = self.stock {
            form.stock = stock;
        }
        if self.year.is_some() {
            form.published_year = self.year;
        }
        if self.isbn.is_some() {
            form.isbn = self.isbn;
        }
        if self.description.is_some() {
            form.description = self.description;
        }
        if self.cover.is_some() {
            form.cover = self.cover;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let state = AppState::build(config).context("Failed to initialize client")?;
    tracing::debug!(
        "Perpus client v{} (timeout {}s)",
        env!("CARGO_PKG_VERSION"),
        state.config.api.timeout_secs
    );

    // Catch-all boundary: a crashing command never takes down the process
    // with a raw panic message.
    match tokio::spawn(run(cli.command, state)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::debug!("Command failed: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Command aborted: {}", e);
            eprintln!("{}", FATAL_ERROR_MESSAGE);
            std::process::exit(2);
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("perpus_client={level},perpus={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(command: Command, state: AppState) -> AppResult<()> {
    let services = &state.services;

    match command {
        Command::Home => {
            let session = services.session.current();
            let books = services.catalog.refresh().await?;
            let preview: Vec<_> = books.into_iter().take(HOME_PREVIEW).collect();
            let view = DashboardView::compose(&session, &preview, &[]);
            println!("Perpustakaan Digital");
            print!("{}", render::dashboard(&view));
        }
        Command::Login { email, password } => {
            let session = services.auth.login(&LoginForm::new(email, password)).await?;
            print_form_state(services.auth.login_form());
            println!("Selamat datang, {}", session.user.name);
            print!("{}", render::menu(&perpus_client::views::visible_menu(session.role())));
        }
        Command::Register(args) => {
            let mut form = RegisterForm {
                name: args.name,
                email: args.email,
                major: args.major,
                grade: args.grade,
                password: args.password,
                confirm_password: args.confirm_password,
                ..Default::default()
            };
            form.set_nis(&args.nis);

            services.auth.register(&form).await?;
            print_form_state(services.auth.register_form());
            println!("Lanjutkan dengan: perpus login --email {}", form.email);
        }
        Command::Logout => {
            services.auth.logout()?;
            println!("Anda telah keluar.");
        }
        Command::Whoami => {
            print!("{}", render::profile(&services.session.current()));
        }
        Command::Dashboard { search, category } => {
            let session = services.session.current();
            let (books, categories) = tokio::try_join!(
                services.catalog.refresh(),
                services.catalog.refresh_categories()
            )?;
            let books = match (&search, category) {
                (None, None) => books,
                _ => services
                    .catalog
                    .search(search.as_deref().unwrap_or(""), category),
            };
            let view = DashboardView::compose(&session, &books, &categories);
            print!("{}", render::dashboard(&view));
        }
        Command::Categories => {
            let categories = services.catalog.refresh_categories().await?;
            print!("{}", render::categories(&categories));
        }
        Command::Book { action } => run_book(action, &state).await?,
        Command::Borrow { book_id } => {
            services.loans.borrow(book_id).await?;
            print_form_state(services.loans.borrow_form());
        }
        Command::Borrowings => {
            let rows = services.loans.list().await?;
            print!("{}", render::borrowings(&rows));
        }
        Command::Return { borrowing_id } => {
            let message = services.loans.return_borrowing(borrowing_id).await?;
            println!("{}", message);
        }
    }

    Ok(())
}

async fn run_book(action: BookCommand, state: &AppState) -> AppResult<()> {
    let catalog = &state.services.catalog;

    match action {
        BookCommand::Show { id } => {
            let (book, categories) = tokio::try_join!(catalog.get(id), catalog.refresh_categories())?;
            print!("{}", render::book(&book, &categories));
        }
        BookCommand::Add(args) => {
            catalog.create(&args.into()).await?;
            print_form_state(catalog.book_form());
        }
        BookCommand::Edit { id, fields } => {
            let mut form = BookForm::from_book(&catalog.get(id).await?);
            fields.apply(&mut form);
            catalog.update(id, &form).await?;
            print_form_state(catalog.book_form());
        }
        BookCommand::Delete { id } => {
            let message = catalog.delete(id).await?;
            println!("{}", message);
        }
    }

    Ok(())
}

fn print_form_state(flow: &FormFlow) {
    if let Some(line) = render::form_state(&flow.state()) {
        println!("{}", line);
    }
}
