
use std::path::PathBuf;
use std::time::Instant;

use structopt::StructOpt;

use wordgrid::score_rules::{ClassicBonus, EnglishScoring};
use wordgrid::{line_position, Board, Direction, Lexicon, Move, Rack, ScoreRules, Solver};

#[derive(Debug, serde::Deserialize)]
struct Settings {
    /// The words that may be played.
    ///
    /// Either a `.txt` file with one word per line, or a `.fst` file
    /// generated with `make_fst`
    dictionary: PathBuf,

    /// The board file, one line per row; lowercase letters are normal
    /// tiles, uppercase a blank playing that letter, `_` or space an
    /// empty square. No file means an empty board and the game's
    /// opening move.
    board: Option<PathBuf>,

    /// The tiles on the rack, `*` for a blank
    rack: String,

    /// The number of top candidates printed, not present means all
    n_shown: Option<usize>,

    #[serde(default = "fifty")]
    extra_bonus: u32,
}

fn fifty() -> u32 {
    50
}

#[derive(Debug, StructOpt)]
#[structopt(name = "play_one", about = "Evaluate a position and play the best move")]
struct Opt {
    /// The config file, if not present, looks for `wordgrid-config`
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// The dictionary, a `.txt` word list or a `.fst` from `make_fst`
    #[structopt(short = "d", long = "dictionary")]
    dictionary: Option<String>,

    /// The board file; omit it for an empty board
    #[structopt(short = "b", long = "board")]
    board: Option<String>,

    /// The rack, a string of letters with `*` for a blank
    #[structopt(short = "r", long = "rack")]
    rack: Option<String>,

    /// The number of top candidates printed
    #[structopt(short = "n", long = "number-shown")]
    n_shown: Option<usize>,
}

fn load_config(opt: Opt) -> Result<Settings, config::ConfigError> {
    let mut s = config::Config::new();

    if let Some(f) = opt.config {
        s.merge(config::File::with_name(&f))?;
    } else {
        s.merge(config::File::with_name("wordgrid-config").required(false))?;
    }

    s.merge(config::Environment::new())?;

    if let Some(d) = opt.dictionary {
        s.set("dictionary", d)?;
    }
    if let Some(b) = opt.board {
        s.set("board", b)?;
    }
    if let Some(r) = opt.rack {
        s.set("rack", r)?;
    }
    if let Some(n) = opt.n_shown {
        s.set::<i64>("n_shown", n as i64)?;
    }

    s.try_into()
}

fn main() {
    simple_logger::SimpleLogger::from_env().init().unwrap();

    let opt = Opt::from_args();
    let conf = load_config(opt).expect("config");

    let start = Instant::now();
    let lexicon = Lexicon::load(&conf.dictionary).expect("loading the dictionary");
    log::info!(
        "dictionary of {} words loaded in {:?}",
        lexicon.len(),
        Instant::now() - start
    );

    let board_text = match &conf.board {
        Some(path) => std::fs::read_to_string(path).expect("reading the board file"),
        None => String::new(),
    };
    let mut board = Board::parse(&board_text);
    let mut rack = Rack::parse(&conf.rack).expect("filling the rack");

    let rules = ScoreRules {
        scoring: EnglishScoring,
        bonuses: ClassicBonus,
        extra_bonus: conf.extra_bonus,
    };

    let start = Instant::now();
    let best = {
        let solver = Solver::new(&board, &lexicon, &rules);
        if board.is_empty() {
            let best = solver.starting_move(&mut rack).expect("the rack changed under us");
            log::info!("opening move found in {:?}", Instant::now() - start);
            best
        } else {
            let moves = solver.generate_all_moves(&rack);
            log::info!(
                "{} candidates found in {:?}",
                moves.len(),
                Instant::now() - start
            );

            let mut ranked: Vec<Move> = moves.into_iter().collect();
            ranked.sort_by(|a, b| b.score.cmp(&a.score));
            for mov in ranked.iter().take(conf.n_shown.unwrap_or(ranked.len())) {
                println!("{:>3}: {}", mov.score, format_move(mov, &board));
            }

            solver.best_move(ranked, &mut rack).expect("the rack changed under us")
        }
    };

    println!("playing: {}", format_move(&best, &board));
    board.commit(&best);
    print!("{}", board);
    println!("rack after the move: {}", rack);
}

fn format_move(mov: &Move, board: &Board) -> String {
    match mov.run {
        Some(run) => {
            let pos = line_position(run.rank, run.direction, run.start);
            let arrow = match run.direction {
                Direction::Horizontal => "→",
                Direction::Vertical => "↓",
            };
            format!(
                "{}{:<2} {} {}",
                (b'A' + pos.col as u8) as char,
                pos.row + 1,
                arrow,
                mov.word_on(board).unwrap_or_default()
            )
        }
        None => {
            if mov.tiles.is_empty() {
                "pass".to_string()
            } else {
                let tiles: String = mov.tiles.iter().map(|t| t.to_string()).collect();
                format!("exchange {}", tiles)
            }
        }
    }
}
