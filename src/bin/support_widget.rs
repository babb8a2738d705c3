// Interactive terminal client for the support chat relay. Point it at a
// running server with CHAT_RELAY_URL (defaults to localhost:3000).
use rand::seq::SliceRandom;
use std::io::{BufRead, Write};

use support_chat::widget::client::WidgetClient;
use support_chat::widget::session::ChatSession;

// Same rotating openers the site widget shows.
const PROMPT_MESSAGES: [&str; 3] = [
    "Need any assistance?",
    "How can I help you?",
    "Ask me about our services",
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let endpoint = std::env::var("CHAT_RELAY_URL")
        .unwrap_or_else(|_| "http://localhost:3000/api/chat".to_string());

    let greeting = PROMPT_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PROMPT_MESSAGES[0]);

    println!("Abhaya Assistant — {}", greeting);
    println!("(relay: {}, empty line to quit)", endpoint);

    let client = WidgetClient::new(endpoint);
    let mut session = ChatSession::new();

    let stdin = std::io::stdin();
    loop {
        print!("\nyou> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        if line.trim().is_empty() {
            break;
        }

        print!("assistant> ");
        std::io::stdout().flush().ok();

        let mut streamed = false;
        client
            .send(&mut session, &line, |fragment| {
                streamed = true;
                print!("{}", fragment);
                std::io::stdout().flush().ok();
            })
            .await;

        // A failed turn streams nothing; the transcript holds the apology.
        if !streamed {
            if let Some(last) = session.messages().last() {
                print!("{}", last.content);
            }
        }
        println!();
    }

    println!("bye!");
}
