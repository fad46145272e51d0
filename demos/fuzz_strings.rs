use std::error::Error;
use tokenstream::{Grammar, StreamConfig, TokenStream};

/// Prints a handful of random strings from the same grammar written in both notations
fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // Bracketed notation: every alternative is a single symbol
    let bracketed = Grammar::from_cfg_str(
        r#"
        greeting -> english | french | german ;
        english = "Hello, world!" ;
        french = "Bonjour, le monde !" ;
        german = "Hallo, Welt!" ;
        "#,
    )?;

    println!("Greetings:");
    for seed in 1..=3 {
        let mut stream = TokenStream::seeded(&bracketed, "greeting", seed);
        println!("{}. {}", seed, stream.produce(64));
    }

    // Line notation allows several symbols per alternative
    let lines = Grammar::from_lines_str(
        "json -> value\n\
         value -> '{' members '}' | '[' elements ']' | scalar | scalar\n\
         members -> | pair | pair ',' pair\n\
         pair -> '\"key\"' ':' value\n\
         elements -> | value | value ',' value\n\
         scalar -> 'null' | 'true' | '42' | '\"text\"'",
    )?;

    println!("\nGrammar:\n{}", lines);

    println!("JSON-ish documents:");
    for i in 1..=5 {
        let config = StreamConfig {
            truncation_marker: " <truncated>".to_string(),
            seed: Some(2024 + i),
        };
        let mut stream = TokenStream::from_config(&lines, "json", config);
        println!("{}. {}", i, stream.produce(60));
    }

    Ok(())
}
