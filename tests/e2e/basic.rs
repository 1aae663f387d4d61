use super::*;

#[test]
fn empty_file() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "")?;
    let out = space.run_fail(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "mininja: error: no targets in build.mn");
    Ok(())
}

#[test]
fn missing_build_file() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run_fail(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "mininja: error: read build.mn: ");
    Ok(())
}

#[test]
fn basic_build() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "out: in | touch out\n")?;
    space.write("in", "")?;
    let out = space.run_expect(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "[1/1] touch out");
    assert_output_contains(&out, "mininja: ran 1 tasks, now up to date");
    assert!(space.exists("out"));

    let out = space.run_expect(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "mininja: no work to do");
    assert_output_not_contains(&out, "touch out");
    Ok(())
}

#[test]
fn compile_scenario() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "out.o: in.c | cp in.c out.o\n")?;
    space.write("in.c", "int main() { return 0; }\n")?;

    let out = space.run_expect(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "cp in.c out.o");
    assert_eq!(space.read("out.o")?, b"int main() { return 0; }\n");

    let out = space.run_expect(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "mininja: no work to do");
    Ok(())
}

#[test]
fn build_file_flag() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("other.mn", "out: | touch out\n")?;
    space.run_expect(&mut mininja_command(vec!["-f", "other.mn"]))?;
    assert!(space.exists("out"));
    Ok(())
}

#[test]
fn chdir_flag() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.mkdir("sub")?;
    space.write("sub/build.mn", "out: | touch out\n")?;
    space.run_expect(&mut mininja_command(vec!["-C", "sub"]))?;
    assert!(space.exists("sub/out"));
    assert!(!space.exists("out"));
    Ok(())
}

#[test]
fn explicit_target() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "build.mn",
        "
a: | touch a
b: | touch b
",
    )?;
    let out = space.run_expect(&mut mininja_command(vec!["a"]))?;
    assert_output_contains(&out, "touch a");
    assert_output_not_contains(&out, "touch b");
    assert!(!space.exists("b"));
    Ok(())
}

#[test]
fn unknown_target() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "a: | touch a\n")?;
    let out = space.run_fail(&mut mininja_command(vec!["nope"]))?;
    assert_output_contains(&out, "mininja: error: unknown path requested: \"nope\"");
    Ok(())
}

#[test]
fn verbose_explains() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "out: in | touch out\n")?;
    space.write("in", "")?;
    let out = space.run_expect(&mut mininja_command(vec!["-v"]))?;
    assert_output_contains(&out, "explain: out: output missing");
    Ok(())
}

#[test]
fn dependencies_run_first() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "build.mn",
        "
mid: | echo mid > mid
out: mid | cat mid > out
",
    )?;
    let out = space.run_expect(&mut mininja_command(vec![]))?;
    let text = std::str::from_utf8(&out.stdout)?;
    let mid = text.find("echo mid").unwrap();
    let last = text.find("cat mid").unwrap();
    assert!(mid < last);
    assert_eq!(space.read("out")?, b"mid\n");
    Ok(())
}

#[test]
fn failed_command() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "build.mn",
        "
a: | false
b: a | touch b
",
    )?;
    let out = space.run_fail(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "failed: false");
    assert_output_contains(&out, "mininja: build stopped after 0 tasks: subcommand failed");
    assert!(!space.exists("b"));
    Ok(())
}

#[test]
fn command_output_is_shown() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "out: | echo hello from the command; touch out\n")?;
    let out = space.run_expect(&mut mininja_command(vec![]))?;
    assert_output_contains(&out, "hello from the command");
    Ok(())
}

#[test]
fn debug_list() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    let out = space.run_fail(&mut mininja_command(vec!["-d", "list"]))?;
    assert_output_contains(&out, "debug tools:");
    Ok(())
}

#[test]
fn debug_trace() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("build.mn", "out: | touch out\n")?;
    space.run_expect(&mut mininja_command(vec!["-d", "trace"]))?;
    let trace = space.read("trace.json")?;
    let trace = std::str::from_utf8(&trace)?;
    assert!(trace.starts_with('['));
    assert!(trace.contains("\"name\": \"work.run\""));
    Ok(())
}
