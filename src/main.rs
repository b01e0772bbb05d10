//! Wagerbot - chat-platform wagering bot interaction core.
//!
//! Demo driver: runs a scripted conversation against the dispatcher the way
//! a platform adapter would, printing each reply.

use tracing_subscriber::EnvFilter;
use wagerbot::platform::{PromptKind, Reply, UiPrompt};
use wagerbot::{ConfigLoader, Dispatcher, InteractionEvent};

/// Pretty-print one reply the way an adapter would render it.
fn render(reply: &Reply) {
    match reply {
        Reply::Message { content, ephemeral } => {
            let scope = if *ephemeral { "(only you)" } else { "(channel)" };
            println!("  bot {}: {}", scope, content);
        }
        Reply::Prompt { content, prompts } => {
            println!("  bot: {}", content);
            for UiPrompt { label, kind, .. } in prompts {
                match kind {
                    PromptKind::Button => println!("    [button: {}]", label),
                    PromptKind::Modal => println!("    [modal: {}]", label),
                }
            }
        }
        Reply::Ignore => println!("  bot: (no reply)"),
    }
}

/// Token of the first prompt in a reply, if any.
fn prompt_token(reply: &Reply) -> Option<String> {
    match reply {
        Reply::Prompt { prompts, .. } => prompts.first().map(|p| p.token.clone()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ConfigLoader::new()
        .with_path("wagerbot.toml")
        .load()
        .unwrap_or_default();
    let bot = Dispatcher::new(config);

    println!("wagerbot demo conversation");
    println!("==========================");

    // Alice plays a round of slots.
    println!("\nalice: /slotmachine");
    let reply = bot.dispatch(InteractionEvent::SlashCommand {
        user: "alice".into(),
        command: "slotmachine".into(),
    });
    render(&reply);
    let start = prompt_token(&reply).expect("start button");

    println!("\nalice clicks START");
    let reply = bot.dispatch(InteractionEvent::ButtonClick {
        user: "alice".into(),
        token: start,
    });
    render(&reply);
    let modal = prompt_token(&reply).expect("bet modal");

    println!("\nalice bets 20");
    let reply = bot.dispatch(InteractionEvent::ModalSubmit {
        user: "alice".into(),
        token: modal.clone(),
        input: "20".into(),
    });
    render(&reply);

    // A stale submit on the same prompt is rejected without a second payout.
    println!("\nalice re-submits the same bet");
    render(&bot.dispatch(InteractionEvent::ModalSubmit {
        user: "alice".into(),
        token: modal,
        input: "20".into(),
    }));

    // Bob tries blackjack with a hand-typed bet that is not a number.
    println!("\nbob: /blackjack");
    let reply = bot.dispatch(InteractionEvent::SlashCommand {
        user: "bob".into(),
        command: "blackjack".into(),
    });
    render(&reply);
    let start = prompt_token(&reply).expect("start button");

    println!("\nbob clicks START");
    let reply = bot.dispatch(InteractionEvent::ButtonClick {
        user: "bob".into(),
        token: start,
    });
    render(&reply);
    let modal = prompt_token(&reply).expect("bet modal");

    println!("\nbob bets \"all of it\"");
    render(&bot.dispatch(InteractionEvent::ModalSubmit {
        user: "bob".into(),
        token: modal.clone(),
        input: "all of it".into(),
    }));

    println!("\nbob bets 25");
    let mut reply = bot.dispatch(InteractionEvent::ModalSubmit {
        user: "bob".into(),
        token: modal,
        input: "25".into(),
    });
    render(&reply);

    // Stand as soon as the hand offers a choice.
    while let Reply::Prompt { prompts, .. } = &reply {
        let stand = prompts
            .iter()
            .find(|p| p.label == "STAND")
            .map(|p| p.token.clone());
        let Some(token) = stand else { break };
        println!("\nbob clicks STAND");
        reply = bot.dispatch(InteractionEvent::ButtonClick {
            user: "bob".into(),
            token,
        });
        render(&reply);
    }

    println!("\nfinal balances:");
    for user in ["alice", "bob"] {
        if let Some(balance) = bot.ledger().balance(user) {
            println!("  {}: {}", user, balance);
        }
    }

    Ok(())
}
