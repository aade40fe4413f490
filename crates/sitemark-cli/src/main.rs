use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use sitemark_core::{BuildOptions, TagProfile, build_with_options, extract_title};

fn main() {
    let mut input: Option<String> = None;
    let mut template: Option<String> = None;
    let mut sanitized = false;
    let mut literal_tags = false;
    let mut title_only = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--sanitized" => sanitized = true,
            "--literal-tags" => literal_tags = true,
            "--title" => title_only = true,
            "--template" => {
                let Some(path) = args.next() else {
                    eprintln!("--template expects a file path");
                    print_usage();
                    process::exit(2);
                };
                template = Some(path);
            }
            flag if flag.starts_with('-') => {
                eprintln!("unknown flag: {}", flag);
                print_usage();
                process::exit(2);
            }
            _ => {
                if input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let source = match input {
        Some(path) => fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .unwrap_or_else(|err| {
                    eprintln!("failed to read stdin: {}", err);
                    process::exit(1);
                });
            buffer
        }
    };

    if title_only {
        match extract_title(&source) {
            Ok(title) => println!("{}", title),
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
        return;
    }

    let options = BuildOptions {
        tag_profile: if literal_tags {
            TagProfile::Literal
        } else {
            TagProfile::Semantic
        },
    };

    let tree = build_with_options(&source, &options).unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });

    let rendered = if sanitized {
        tree.to_html_sanitized()
    } else {
        tree.to_html()
    };
    let html = rendered.unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });

    let output = match template {
        Some(path) => {
            let template = fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("failed to read {}: {}", path, err);
                process::exit(1);
            });
            let title = extract_title(&source).unwrap_or_else(|err| {
                eprintln!("{}", err);
                process::exit(1);
            });
            template
                .replace("{{ Title }}", &title)
                .replace("{{ Content }}", &html)
        }
        None => html,
    };

    print!("{}", output);
}

fn print_usage() {
    eprintln!(
        "Usage: sitemark-cli [--sanitized] [--literal-tags] [--title] [--template FILE] [input]"
    );
}
