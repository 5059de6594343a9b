//! The `proctor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create proctor.toml
    if std::path::Path::new("proctor.toml").exists() {
        println!("proctor.toml already exists, skipping.");
    } else {
        std::fs::write("proctor.toml", SAMPLE_CONFIG)?;
        println!("Created proctor.toml");
    }

    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.json");
    if example_path.exists() {
        println!("quizzes/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit proctor.toml to set your default test time");
    println!("  2. Run: proctor validate --quiz quizzes/example.json");
    println!("  3. Run: proctor take --quiz quizzes/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# proctor configuration

# Default test duration in minutes (--minutes overrides this).
default_minutes = 20

# Where `proctor take` saves report artifacts.
output_dir = "./proctor-results"
"#;

const EXAMPLE_QUIZ: &str = r#"[
  {
    "question_number": 1,
    "question": "Which keyword introduces a new variable binding in Rust?",
    "options": {
      "A": "var",
      "B": "let",
      "C": "def",
      "D": "dim"
    },
    "answer": ["B"]
  },
  {
    "question_number": 2,
    "question": "Which of the following are reference-counted pointer types? (Select all that apply)",
    "options": {
      "A": "Rc<T>",
      "B": "Box<T>",
      "C": "Arc<T>",
      "D": "Cell<T>"
    },
    "answer": ["A", "C"]
  },
  {
    "question_number": 3,
    "question": "What does `cargo test` do?",
    "options": {
      "A": "Formats the code",
      "B": "Publishes the crate",
      "C": "Builds and runs the test suite",
      "D": "Removes the target directory"
    },
    "answer": ["C"]
  }
]
"#;
