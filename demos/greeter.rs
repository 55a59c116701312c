use actionline::{ActionSpec, CommandLine, Mapper, OptionSpec, Parameter};

fn main() {
    let registry = CommandLine::new("greeter")
        .action(
            "hello",
            ActionSpec::new()
                .about("Greet someone by name.")
                .add(Parameter::option(
                    "shout",
                    OptionSpec::flag("s", "shout").unwrap(),
                ))
                .add(Parameter::argument("name", Mapper::identity())),
            |arguments| {
                let greeting = format!("Hello, {}!", arguments.argument::<String>("name").unwrap());

                if arguments.flag("shout") {
                    greeting.to_uppercase()
                } else {
                    greeting
                }
            },
        )
        .default_action(ActionSpec::new(), |_| "Nobody to greet.".to_string())
        .build();

    println!("{}", registry.run());
}
