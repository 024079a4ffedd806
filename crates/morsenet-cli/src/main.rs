//! Morsenet CLI - scripted demonstration of the store-and-forward simulation

use clap::Parser;
use tracing::info;

use morsenet_net::{CommunicationNetwork, NodeId, Person};

#[derive(Parser)]
#[command(name = "morsenet", about = "Store-and-forward network simulation demo")]
struct Cli {
    /// Enable debug logging (per-hop forwarding, registrations)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run_demo()
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();
}

/// Build a small weighted topology, join a few persons, and exchange traffic.
fn run_demo() -> anyhow::Result<()> {
    let network = CommunicationNetwork::shared();
    {
        let mut net = network.borrow_mut();
        for id in [1, 2, 3] {
            net.add_node(NodeId::new(id))?;
        }
        // The direct 1-3 edge is deliberately expensive: traffic between
        // those gateways routes via node 2.
        net.link(NodeId::new(1), NodeId::new(2), 1)?;
        net.link(NodeId::new(2), NodeId::new(3), 2)?;
        net.link(NodeId::new(1), NodeId::new(3), 10)?;
    }
    info!("topology ready: 3 nodes, 3 links");

    let mut alice = Person::new("alice", "this is a simple text to train create the key");
    let mut bob = Person::new("bob", "this is another text bob wrote to seed his key");
    let mut carol = Person::new("carol", "carol trains with her own words and numbers 42");

    alice.join(&network, NodeId::new(1))?;
    bob.join(&network, NodeId::new(1))?;
    carol.join(&network, NodeId::new(3))?;

    alice.send_message_to("carol", "hi carol meet at 15")?;
    carol.send_urgent_message_to("alice", "on my way")?;
    bob.send_very_urgent_message_to_everyone("network maintenance tonight")?;

    for person in [&alice, &bob, &carol] {
        println!("--- mailbox of {} ---", person.id());
        for message in person.get_all_messages()? {
            let scope = if message.is_broadcast() { "broadcast" } else { "direct" };
            println!(
                "  [{:?}/{scope}] {}: {}",
                message.priority, message.sender, message.content
            );
        }
    }

    Ok(())
}
