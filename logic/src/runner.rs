use crate::adapter::{Adapter, AdapterBox};
use crate::arguments::Arguments;
use crate::conversion::{ConversionRequest, convert};
use crate::error::ConversionError;
use crate::version::get_version;
use clap::Parser;
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::fmt::Write;
use std::rc::Rc;
use um_env_base::logging::info;
use um_env_base::result::{MietteReportError, UmEnvError, UmEnvResult};

pub struct UmEnvRunner {
    adapter: AdapterBox,
    report_handler: GraphicalReportHandler,
}

impl UmEnvRunner {
    pub fn new(adapter: impl Adapter) -> Self {
        let want_color = want_color(adapter.env());
        let theme = if want_color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let report_handler = GraphicalReportHandler::new_themed(theme);
        Self {
            adapter: Rc::new(adapter),
            report_handler,
        }
    }

    pub fn run(&self) {
        info!("Running um-env-to-yaml ({})", get_version());
        match self.run_inner() {
            Ok(()) => {}
            Err(err) => {
                if let Err(print_err) = self.print_error(err) {
                    self.adapter
                        .print(&format!("ERROR: Failed to print error: {print_err}\n"));
                }
                self.adapter.exit(1);
            }
        }
    }

    fn run_inner(&self) -> UmEnvResult<()> {
        let arguments = match Arguments::try_parse_from(self.adapter.args()) {
            Ok(arguments) => arguments,
            Err(error) => {
                // help and version end up here as well, with exit code 0
                self.adapter.print(&error.render().to_string());
                self.adapter.exit(error.exit_code());
                return Ok(());
            }
        };
        let request = ConversionRequest::from(arguments);
        convert(self.adapter.as_ref(), &request)?;
        Ok(())
    }

    fn print_error(&self, err: UmEnvError) -> UmEnvResult<()> {
        let mut message = format!("ERROR running um-env-to-yaml ({}): {err}\n", get_version());
        let mut help_text = String::new();
        if err.source().is_some() {
            message.push_str("  Chain of causes:\n");
            err.chain().skip(1).enumerate().for_each(|(index, err)| {
                message.push_str(&format!("   {index}: {err}\n"));
            });
            message.push('\n');
        }
        for err in err.chain() {
            if let Some(err) = err.downcast_ref::<MietteReportError>() {
                self.report_handler
                    .render_report(&mut message, err.report().as_ref())?;
            } else if let Some(help) = err
                .downcast_ref::<ConversionError>()
                .and_then(ConversionError::help)
            {
                writeln!(help_text, "Help: {help}")?;
            }
        }
        // omit backtrace in tests to prevent noise in test output
        #[cfg(not(test))]
        {
            let backtrace = err.backtrace();
            if let std::backtrace::BacktraceStatus::Captured = backtrace.status() {
                message.push_str("\n  Backtrace:\n");
                message.push_str(&backtrace.to_string());
            }
        }
        // put help text last
        message.push_str(&help_text);
        self.adapter.print(&message);
        Ok(())
    }
}

fn want_color(env: Vec<(String, String)>) -> bool {
    let mut want_color = true;
    for (key, value) in env {
        if key == "NO_COLOR" && !value.is_empty() {
            want_color = false;
        }
    }
    want_color
}
