use lfme_cli::args::{parse_args, print_usage, Command};
use lfme_cli::run;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Ok(Command::Run(args)) => args,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match run(&args).await {
        Ok(report) => println!("{}", report),
        Err(e) => {
            log::error!("Prediction failed: {:?}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
