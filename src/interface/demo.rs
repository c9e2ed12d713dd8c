//! 데모 바이너리가 등록하는 플래그/명령.

use std::sync::Arc;

use crate::application::console::Console;
use crate::domain::command::CommandHandler;
use crate::domain::error::ConsoleError;
use crate::domain::flag::{FlagDef, InputKind};

/// 시작 플래그, 기본 플래그 핸들러, `example` 명령을 등록한다.
pub fn register(console: &mut Console) -> Result<(), ConsoleError> {
    let out = console.output();

    console.terminal_add_flag(
        FlagDef::new("--example")
            .short("-e")
            .description(
                "Awkwardly long terminal flag, i mean common. \
                 How come you need this long description for a simple flag?",
            )
            .input(InputKind::Int),
    )?;

    // 앞의 대시는 있어도 없어도 된다.
    let custom_out = Arc::clone(&out);
    console.terminal_add_flag(
        FlagDef::new("custom")
            .short("c")
            .description("This flag supplies its own custom handler!")
            .handler(move |ctx| {
                custom_out.line(&format!(
                    "Custom flag handler for flag '{}'",
                    ctx.flag_name.as_deref().unwrap_or_default()
                ));
                Ok(())
            }),
    )?;

    console.terminal_quickadd_flags(&["test", "more"], "?m")?;

    let default_out = Arc::clone(&out);
    console.set_default_flag_handler(move |ctx| {
        default_out.line(&default_flag_message(
            ctx.flag_name.as_deref(),
            ctx.flag_input.as_ref().map(ToString::to_string).as_deref(),
        ));
        Ok(())
    });

    let command_out = out;
    console
        .add_command(
            "example",
            CommandHandler::call(move |ctx| {
                command_out.line(&format!(
                    "Custom command handler for command '{}'",
                    ctx.command_name
                ));
                if !ctx.args.is_empty() {
                    command_out.line(&format!("arguments: {}", ctx.args.join(" ")));
                }
                Ok(())
            }),
            "My in-program command",
            "<input_file> <output_file>",
        )?
        .add_flag(FlagDef::new("example-flag").short("f"))?;

    Ok(())
}

fn default_flag_message(flag: Option<&str>, input: Option<&str>) -> String {
    format!(
        "Default flag handler for flag '{}', with input: {}",
        flag.unwrap_or_default(),
        input.unwrap_or("none")
    )
}
