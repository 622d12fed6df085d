use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::debug;

use recipe_pantry::{
    format_recipe_with, read_recipe_text, FormatOptions, HttpRecipeApi, PantryConfig, RecipeApi,
    Session,
};

#[derive(Debug, Parser)]
#[command(
    name = "recipe-pantry",
    version,
    about = "Generate recipes from what is in your kitchen and keep the good ones."
)]
struct Cli {
    /// Recipe API base URL (overrides pantry.toml and PANTRY__API__BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Escape HTML in recipe text before formatting
    #[arg(long, global = true)]
    escape: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest recipe titles for a list of ingredients
    Titles {
        #[arg(short, long)]
        ingredients: String,
        #[arg(short, long, default_value = "")]
        preferences: String,
    },
    /// Generate a full recipe and print it as HTML
    Generate {
        #[arg(short, long)]
        ingredients: String,
        #[arg(short, long, default_value = "")]
        preferences: String,
        /// Recipe title to generate; defaults to the first suggestion
        #[arg(short, long)]
        title: Option<String>,
        /// Save the generated recipe to the pantry
        #[arg(long)]
        save: bool,
    },
    /// List the recipes saved in the pantry
    List,
    /// Remove a recipe from the pantry
    Remove { title: String },
    /// Format recipe text from a file (or stdin) as HTML
    Format { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = PantryConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if cli.escape {
        config.formatter.escape_html = true;
    }
    debug!("{:#?}", config);

    match cli.command {
        Command::Titles {
            ingredients,
            preferences,
        } => {
            let api = HttpRecipeApi::new(&config.api)?;
            for (i, title) in api
                .generate_titles(&ingredients, &preferences)
                .await?
                .iter()
                .enumerate()
            {
                println!("{}. {}", i + 1, title);
            }
        }
        Command::Generate {
            ingredients,
            preferences,
            title,
            save,
        } => {
            let mut session = Session::from_config(&config)?;
            session.set_ingredients(ingredients);
            session.set_preferences(preferences);
            match title {
                Some(title) => session.select_title(title).await,
                None => session.generate_titles().await,
            }

            let Some(recipe) = session.recipe() else {
                return Err("No recipe was generated".into());
            };
            println!("<h1>{}</h1>", recipe.title);
            println!("{}", session.formatted_recipe());

            if save {
                let before = session.saved_recipes().len();
                session.save_recipe().await;
                if session.saved_recipes().len() == before {
                    return Err("Recipe was not saved".into());
                }
            }
        }
        Command::List => {
            let mut session = Session::from_config(&config)?;
            session.load_saved_recipes().await;
            let recipes: Vec<_> = session.displayable_recipes().collect();
            if recipes.is_empty() {
                println!("No recipes saved yet. Start cooking to fill up your pantry!");
            }
            for recipe in recipes {
                println!("<h3>{}</h3>", recipe.title);
                println!("{}", session.format(recipe));
            }
        }
        Command::Remove { title } => {
            let api = HttpRecipeApi::new(&config.api)?;
            api.remove_recipe(&title).await?;
            println!("Removed '{}' from the pantry", title);
        }
        Command::Format { file } => {
            let text = read_recipe_text(file.as_deref()).await?;
            let options = FormatOptions {
                escape_html: config.formatter.escape_html,
            };
            println!("{}", format_recipe_with(&text, &options));
        }
    }

    Ok(())
}
