use adaops::cli::{parse_args, Command, USAGE};
use adaops::{CardanoCli, RotationEngine};
use serde::Serialize;

fn main() {
    // .env primero: CARDANO_* y RUST_LOG pueden venir de ahí
    ada_core::config::init_dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[adaops] {e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    let cli = match CardanoCli::from_env(command.connectivity()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[adaops] configuración: {e}");
            std::process::exit(3);
        }
    };
    log::debug!("network={} era={}", cli.context().network().id(), cli.context().era().as_str());

    let code = match command {
        Command::Tip => report(cli.tip()),
        Command::Utxo { address } => report(cli.utxos_at(&address)),
        Command::Balance { address } => report(cli.balance(&address)),
        Command::RotateKes(rotate) => {
            let plan = match rotate.plan() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("[adaops] plan: {e}");
                    std::process::exit(2);
                }
            };
            let mut engine = RotationEngine::new(cli);
            match engine.run(&plan) {
                Ok(state) => {
                    let failed = state.failure().is_some();
                    print_json(&state);
                    if failed { 4 } else { 0 }
                }
                Err(e) => {
                    eprintln!("[adaops] rotación: {e}");
                    5
                }
            }
        }
    };
    std::process::exit(code);
}

fn report<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> i32 {
    match result {
        Ok(value) => {
            print_json(&value);
            0
        }
        Err(e) => {
            eprintln!("[adaops] {e}");
            4
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("[adaops] serialización: {e}"),
    }
}
