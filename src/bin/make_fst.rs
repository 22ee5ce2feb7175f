
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "make_fst",
    about = "Compile a word list into an fst dictionary for faster loading"
)]
struct Opt {
    /// The input list, one word per line
    #[structopt(short = "i", long = "input-list", parse(from_os_str))]
    list_file: PathBuf,

    /// Where to write the compiled dictionary
    #[structopt(short = "o", long = "output-fst", parse(from_os_str))]
    fst_file: PathBuf,
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let opt = Opt::from_args();

    wordgrid::lexicon::compile_word_list(&opt.list_file, &opt.fst_file)
        .expect("compiling the word list");
}
