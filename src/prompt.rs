//! Console questionnaire for users who prefer answering questions to flags.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::export::with_suffix;

const YES: [&str; 3] = ["Y", "y", "yes"];
const NO: [&str; 3] = ["N", "n", "no"];
const LIST_END: &str = "exit";

/// Line-oriented question/answer session over any reader and writer.
pub struct Questionnaire<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Questionnaire<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Ask until the answer is one of `y/yes/n/no`.
    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        writeln!(self.output, "{question} (y or n)")?;
        loop {
            let answer = self.read_answer()?;
            if YES.contains(&answer.as_str()) {
                return Ok(true);
            }
            if NO.contains(&answer.as_str()) {
                return Ok(false);
            }
            writeln!(self.output, "the answer must be either Y or N, or yes or no")?;
        }
    }

    pub fn ask_line(&mut self, question: &str) -> io::Result<String> {
        writeln!(self.output, "{question}")?;
        self.read_answer()
    }

    /// Collect answers until the user types `exit`.
    pub fn ask_list(&mut self, question: &str) -> io::Result<Vec<String>> {
        let mut items = Vec::new();
        loop {
            writeln!(self.output, "{question} (write '{LIST_END}' to finish)")?;
            let answer = self.read_answer()?;
            if answer == LIST_END {
                return Ok(items);
            }
            items.push(answer);
        }
    }

    /// Ask until the answer names an existing path.
    pub fn ask_existing_dir(&mut self, question: &str) -> io::Result<PathBuf> {
        writeln!(self.output, "{question}")?;
        loop {
            let path = PathBuf::from(self.read_answer()?);
            if path.exists() {
                return Ok(path);
            }
            writeln!(self.output, "It appears that this filepath does not exist: {}", path.display())?;
        }
    }

    /// Walk through the setup questions, updating `config`, and return the
    /// experiment directory.
    pub fn run(&mut self, config: &mut RunConfig) -> io::Result<PathBuf> {
        writeln!(
            self.output,
            "Welcome to the PAM data plotter and data collector. You will now be asked a few\n\
             questions about how you want your data processed."
        )?;

        config.make_plot = self.ask_yes_no("Do you want a plot of your data?")?;
        if config.make_plot {
            writeln!(
                self.output,
                "These are the possible columns to plot from: [t, ML, Temp., PAR, F, Fo', Fm', ~Fo', \
                 Y(II), Y(NPQ), Y(NO), NPQ, qN, qP, qL, ETR, NPQown, PSII', rETR]"
            )?;
            if self.ask_yes_no(
                "Do you want to enter custom axes to plot? If not the defaults of 'NPQown' and 'rETR' are plotted against time 't'.",
            )? {
                config.plot.x_axis_columns =
                    self.ask_list("What data do you want plotted on the x-axis? Write the exact column name.")?;
                config.plot.y_axis_columns =
                    self.ask_list("What data do you want plotted on the y-axis? Write the exact column name.")?;
            }
            config.plot.sample_tags =
                self.ask_list("Enter a common root of the sample names you wish to be grouped, e.g. LHCX1g1")?;
            config.plot.wildtype_tag = self.ask_line("Enter a common section of all wildtype sample names, e.g. WT")?;
        }

        let output = &mut config.output;
        output.save_workbook =
            self.ask_yes_no("Do you want your experiment data consolidated into an excel workbook (.xlsx)?")?;
        if output.save_workbook
            && self.ask_yes_no("Do you want a custom name for the xlsx file? The default is the experiment directory name.")?
        {
            let name = self.ask_line("What should the excel workbook file be named?")?;
            output.workbook_name = Some(with_suffix(&name, ".xlsx"));
        }

        output.save_csv = self.ask_yes_no("Do you wish to have your data consolidated into .CSV files?")?;
        if output.save_csv
            && self.ask_yes_no(
                "Do you want custom names for the .CSV files? The defaults are the experiment directory name + '_mainData.CSV' and '_maxData.CSV'.",
            )?
        {
            let main = self.ask_line("What should the CSV file containing the main dataset be named?")?;
            let max = self.ask_line("What should the CSV file containing the max values for each sample be named?")?;
            output.csv_names.main = Some(with_suffix(&main, ".CSV"));
            output.csv_names.max = Some(with_suffix(&max, ".CSV"));
        }

        self.ask_existing_dir("Write the directory where your PAM experimental data is stored, e.g. 20210619")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(answers: &str) -> Questionnaire<Cursor<Vec<u8>>, Vec<u8>> {
        Questionnaire::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_yes_no_retries() {
        let mut q = session("maybe\nYES\nn\n");
        assert!(!q.ask_yes_no("ok?").unwrap());
        let printed = String::from_utf8(q.output).unwrap();
        assert_eq!(printed.matches("the answer must be").count(), 2);
    }

    #[test]
    fn test_list_until_exit() {
        let mut q = session("a\nb\nexit\n");
        assert_eq!(q.ask_list("items").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut q = session("");
        assert_eq!(
            q.ask_yes_no("ok?").unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let answers = format!(
            "y\nn\nLHCX1g1\nexit\nWT\ny\ny\nmerged\ny\nn\n{}\n",
            dir.path().display()
        );
        let mut q = session(&answers);
        let mut config = RunConfig::default();
        let experiment = q.run(&mut config).unwrap();

        assert_eq!(experiment, dir.path());
        assert!(config.make_plot);
        assert_eq!(config.plot.x_axis_columns, vec!["t"]);
        assert_eq!(config.plot.sample_tags, vec!["LHCX1g1"]);
        assert_eq!(config.plot.wildtype_tag, "WT");
        assert_eq!(config.output.workbook_name.as_deref(), Some("merged.xlsx"));
        assert!(config.output.save_csv);
        assert_eq!(config.output.csv_names.main, None);
    }
}
