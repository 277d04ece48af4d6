// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fs;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use cathy::chatter::Chatter;
use cathy::chatter::DEFAULT_MAX_WORDS;
use cathy::chatter::is_farewell;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

const GREETING: &str = "\
Hi, I'm Chatty Cathy! Let's have a chat!

You tell me something. Press enter when you're done. Then I'll
respond. If you want to quit, respond with \"bye\", \"goodbye\",
or \"quit\", or just press enter without saying anything at all.

I will learn to chat from what you tell me. At first I will only know
how to repeat what you say. The more you repeat yourself the less I
will repeat myself. But it will take me a l-o-o-o-n-g time to start being original.";

/// A chat bot that takes a long, long time to warm up.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed the random generator for a reproducible conversation.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of words in one response.
    #[arg(long, default_value_t = DEFAULT_MAX_WORDS, value_parser = parse_max_words)]
    max_words: usize,

    /// Learn from this file first, one message per line.
    #[arg(long)]
    train: Option<PathBuf>,
}

fn parse_max_words(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(max_words) => Ok(max_words),
        Err(err) => Err(err.to_string()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match chat(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chatty: {err}");
            ExitCode::FAILURE
        }
    }
}

fn chat(args: Args) -> io::Result<()> {
    let mut chatter = Chatter::with_max_words(args.max_words);
    if let Some(path) = &args.train {
        for line in fs::read_to_string(path)?.lines() {
            chatter.ponder(line);
        }
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{GREETING}")?;
    loop {
        write!(stdout, "\nYou: ")?;
        stdout.flush()?;

        let mut text = String::new();
        if stdin.lock().read_line(&mut text)? == 0 || is_farewell(&text) {
            break;
        }
        chatter.ponder(&text);
        if let Some(response) = chatter.respond(&mut rng) {
            writeln!(stdout, "\nCathy: {response}")?;
        }
    }
    writeln!(stdout, "\nCathy: It's been good chatting with you!")?;
    Ok(())
}
