use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    prebake completions bash > ~/.bash_completion.d/prebake\n\n\
                  Generate zsh completions:\n    prebake completions zsh > ~/.zfunc/_prebake\n\n\
                  Generate fish completions:\n    prebake completions fish > ~/.config/fish/completions/prebake.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
