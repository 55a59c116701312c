use actionline::{ActionSpec, Arguments, CommandLine, Mapper, OptionKind, OptionSpec, Parameter};

fn install(arguments: Arguments) -> i32 {
    let package = arguments.argument::<String>("package").unwrap();
    let version = arguments
        .argument::<String>("version")
        .map(String::as_str)
        .unwrap_or("latest");

    if arguments.count("verbose") > 0 {
        println!("Resolving {package} ({version}).");
    }

    match arguments.option::<u8>("retries") {
        Some(retries) => println!("Installing {package}=={version} (retries: {retries})."),
        None => println!("Installing {package}=={version}."),
    }

    0
}

fn remove(arguments: Arguments) -> i32 {
    let dry_run = arguments.flag("dry_run");

    for package in arguments.rest() {
        if dry_run {
            println!("Would remove {package}.");
        } else {
            println!("Removing {package}.");
        }
    }

    0
}

fn main() {
    let registry = CommandLine::new("package_manager")
        .action(
            "install",
            ActionSpec::new()
                .about("Install a package, optionally at a specific version.")
                .add(Parameter::option(
                    "verbose",
                    OptionSpec::derived("verbose", OptionKind::Count).unwrap(),
                ))
                .add(Parameter::option(
                    "retries",
                    OptionSpec::key("r", "retries", Mapper::parse::<u8>()).unwrap(),
                ))
                .add(Parameter::argument("package", Mapper::identity()))
                .add(Parameter::optional_argument("version", Mapper::identity())),
            install,
        )
        .action(
            "remove",
            ActionSpec::new()
                .about("Remove any number of packages.")
                .add(Parameter::option(
                    "dry_run",
                    OptionSpec::derived("dry_run", OptionKind::Flag).unwrap(),
                ))
                .variadic(),
            remove,
        )
        .build();

    std::process::exit(registry.run());
}
