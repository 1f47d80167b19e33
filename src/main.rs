use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use log::{error, info};
use phenoperm::param::{self, Param};
use phenoperm::run;
use std::error::Error;
use std::process;

fn start_logger(param: &Param) -> Result<flexi_logger::LoggerHandle, Box<dyn Error>> {
    let logger = Logger::try_with_str(&param.general.log_level)?;
    let handle = if param.general.log_base.is_empty() {
        logger.log_to_stdout().start()?
    } else {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        logger
            .log_to_file(
                FileSpec::default()
                    .basename(&param.general.log_base)
                    .discriminant(timestamp)
                    .suffix(&param.general.log_suffix),
            )
            .start()?
    };
    Ok(handle)
}

fn main() {
    let param_file = std::env::args().nth(1).unwrap_or_else(|| "param.yaml".to_string());

    let param = match param::get(&param_file) {
        Ok(param) => param,
        Err(e) => {
            eprintln!("Cannot load parameters from {}: {}", param_file, e);
            process::exit(1);
        }
    };

    let _logger = match start_logger(&param) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Cannot start logger: {}", e);
            process::exit(1);
        }
    };

    info!(
        "phenoperm {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("PHENOPERM_GIT_SHA").unwrap_or("unknown")
    );

    match run(&param) {
        Ok(summary) => {
            if param.output.print_cls {
                print!("{}", summary.template.as_string(param.output.use_class_names));
            }
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
