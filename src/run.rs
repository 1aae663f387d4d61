//! Command-line entry point: parses flags, loads the build file, and runs
//! the build.

use anyhow::anyhow;
use argh::FromArgs;
use std::path::Path;

use crate::fs::RealFileSystem;
use crate::progress::ConsoleProgress;
use crate::task::ShellRunner;
use crate::work::{BuildResult, Work};
use crate::{load, trace};

#[derive(FromArgs)]
/// mininja, rebuilds the out of date outputs of a build file
struct Args {
    /// chdir before running
    #[argh(option, short = 'C')]
    chdir: Option<String>,

    /// input build file [default=build.mn]
    #[argh(option, short = 'f', default = "String::from(\"build.mn\")")]
    file: String,

    /// debugging tools, "-d list" to list
    #[argh(option, short = 'd')]
    debug: Option<String>,

    /// print why each build is out of date
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// targets to build [default=output of the last rule]
    #[argh(positional)]
    targets: Vec<String>,
}

// Load the build file and build the requested targets.
fn build(args: &Args) -> anyhow::Result<BuildResult> {
    let fs = RealFileSystem::new();
    let state = trace::scope("load::read", || load::read(&fs, &args.file))?;

    let mut runner = ShellRunner::default();
    let mut progress = ConsoleProgress::new(args.verbose);
    let mut work = Work::new(&state.graph, &fs, &mut runner, &mut progress);
    if args.targets.is_empty() {
        work.want_fileid(state.default);
    } else {
        for name in &args.targets {
            work.want_file(name)?;
        }
    }
    trace::scope("work.run", || work.run())
}

fn run_impl() -> anyhow::Result<i32> {
    let args: Args = argh::from_env();

    if let Some(debug) = &args.debug {
        match debug.as_str() {
            "list" => {
                println!("debug tools:");
                println!("  trace  generate json performance trace");
                return Ok(1);
            }
            "trace" => trace::open("trace.json")?,
            _ => anyhow::bail!("unknown -d {:?}, use -d list to list", debug),
        }
    }

    if let Some(dir) = &args.chdir {
        let dir = Path::new(dir);
        std::env::set_current_dir(dir).map_err(|err| anyhow!("chdir {:?}: {}", dir, err))?;
    }

    match build(&args)? {
        BuildResult::Success(0) => {
            // Special case: don't print numbers when no work done.
            println!("mininja: no work to do");
        }
        BuildResult::Success(n) => {
            println!("mininja: ran {} tasks, now up to date", n);
        }
        BuildResult::Failed { built } => {
            println!(
                "mininja: build stopped after {} tasks: subcommand failed",
                built
            );
            return Ok(1);
        }
    }

    Ok(0)
}

pub fn run() -> anyhow::Result<i32> {
    let res = run_impl();
    trace::close()?;
    res
}
