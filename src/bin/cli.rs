use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::StatusCode;

use bookshelf::{Author, Book, BookDraft};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf CRUD client for a running bookshelf-server", long_about = None)]
struct Cli {
    /// Base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books on the shelf
    List,
    /// Show a single book
    Show {
        /// Book id to show
        id: String,
    },
    /// Add a new book
    Add {
        /// Book title
        title: String,
        /// Author first name
        #[arg(long, default_value = "")]
        firstname: String,
        /// Author last name
        #[arg(long, default_value = "")]
        lastname: String,
    },
    /// Replace an existing book, keeping its id
    Update {
        /// Book id to replace
        id: String,
        /// New title
        title: String,
        /// Author first name
        #[arg(long, default_value = "")]
        firstname: String,
        /// Author last name
        #[arg(long, default_value = "")]
        lastname: String,
    },
    /// Remove a book from the shelf
    Remove {
        /// Book id to remove
        id: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    match cli.command {
        Commands::List => {
            let books: Vec<Book> = client
                .get(format!("{}/books", cli.server))
                .send()?
                .error_for_status()?
                .json()?;

            if books.is_empty() {
                println!("No books on the shelf.");
            } else {
                for book in &books {
                    print_book(book);
                }
            }
        }
        Commands::Show { id } => {
            let response = client.get(format!("{}/books/{}", cli.server, id)).send()?;

            if response.status() == StatusCode::NOT_FOUND {
                eprintln!("Book not found: {}", id);
                std::process::exit(1);
            }

            let book: Book = response.error_for_status()?.json()?;
            print_book(&book);
        }
        Commands::Add {
            title,
            firstname,
            lastname,
        } => {
            let draft = BookDraft {
                title,
                author: Author::new(firstname, lastname),
            };

            let book: Book = client
                .post(format!("{}/books", cli.server))
                .json(&draft)
                .send()?
                .error_for_status()?
                .json()?;

            println!("Added book {}", book.id);
            print_book(&book);
        }
        Commands::Update {
            id,
            title,
            firstname,
            lastname,
        } => {
            let draft = BookDraft {
                title,
                author: Author::new(firstname, lastname),
            };

            let response = client
                .put(format!("{}/books/{}", cli.server, id))
                .json(&draft)
                .send()?;

            if response.status() == StatusCode::NOT_FOUND {
                eprintln!("Book not found: {}", id);
                std::process::exit(1);
            }

            let book: Book = response.error_for_status()?.json()?;
            println!("Updated book {}", book.id);
            print_book(&book);
        }
        Commands::Remove { id } => {
            let remaining: Vec<Book> = client
                .delete(format!("{}/books/{}", cli.server, id))
                .send()?
                .error_for_status()?
                .json()?;

            println!("Removed book {} ({} remaining)", id, remaining.len());
        }
    }

    Ok(())
}

fn print_book(book: &Book) {
    let author = format!("{} {}", book.author.firstname, book.author.lastname);
    let author = author.trim();

    if author.is_empty() {
        println!("{}  {}", book.id, book.title);
    } else {
        println!("{}  {}  [{}]", book.id, book.title, author);
    }
}
