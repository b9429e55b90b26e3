mod test_cli;
mod test_run;
