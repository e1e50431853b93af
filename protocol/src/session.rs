use std::io::{BufRead, Write};

use sweepduel_core::*;

use crate::{Result, *};

/// Host role: read a map, then apply one move line at a time and answer
/// each with the disclosed board. Malformed move lines are skipped. The
/// summary is written once the game ends or the input runs out.
pub fn run_host<R: BufRead, W: Write>(reader: &mut LineReader<R>, out: &mut W) -> Result<Summary> {
    let layout = read_map(reader)?;
    let mut engine = PlayEngine::new(layout);

    while !engine.is_finished() {
        let Some((line, text)) = reader.next_line()? else {
            log::debug!("input ended while the game was still running");
            break;
        };

        let command = match parse_command_line(line, &text) {
            Ok(command) => command,
            Err(err) => {
                log::warn!("skipping move: {err}");
                continue;
            }
        };

        match command.to_move() {
            Some(mv) => {
                engine.apply(mv);
            }
            None => log::debug!("ignoring out of range move {command}"),
        }

        out.write_all(render_board(&engine.disclose()).as_bytes())?;
        out.flush()?;
    }

    let summary = engine.summary();
    write!(out, "{}", SummaryLines(summary))?;
    out.flush()?;
    Ok(summary)
}

/// Client role: read the board size and the opening cell, visit it, then
/// answer every disclosed board with exactly one move. Returns the number of
/// moves sent.
pub fn run_client<R, W, P>(reader: &mut LineReader<R>, out: &mut W, player: &mut P) -> Result<usize>
where
    R: BufRead,
    W: Write,
    P: Player + ?Sized,
{
    let size = read_dimensions(reader)?;
    let [row, column] = reader.expect_ints("opening move")?;

    writeln!(
        out,
        "{}",
        Command {
            row,
            column,
            kind: MoveKind::Visit,
        }
    )?;
    out.flush()?;
    let mut moves = 1;

    loop {
        let Some((line, first)) = reader.next_line()? else {
            break;
        };
        if is_summary_line(&first) {
            log::debug!("host reported: {first}");
            break;
        }

        let board = read_board_after(reader, size, (line, &first))?;
        let model = KnowledgeModel::from_glyphs(&board)?;
        if model.is_final() {
            log::debug!("final board received, waiting for the summary");
            continue;
        }
        let Some(decision) = player.next_move(&model) else {
            log::warn!("no move available on board ending at line {}", reader.line_number());
            break;
        };

        writeln!(out, "{}", Command::from(decision.mv))?;
        out.flush()?;
        moves += 1;
    }

    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3 3\n.X.\n..X\n...\n";

    fn host(input: &str) -> (Summary, String) {
        let mut out = Vec::new();
        let summary = run_host(&mut LineReader::new(input.as_bytes()), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn host_prints_board_after_each_move_and_loses_on_mine() {
        let (summary, output) = host(&format!("{SAMPLE}2 0 0\n0 1 0\n2 2 0\n"));

        assert_eq!(summary.state, EngineState::Lost);
        assert_eq!(output, "???\n12?\n01?\n?X?\n12?\n01?\nGAME OVER!\n4 0\n");
    }

    #[test]
    fn host_reports_all_mines_on_win() {
        let (summary, output) = host(&format!("{SAMPLE}0 1 1\n2 0 0\n0 0 0\n0 2 0\n2 2 0\n"));

        assert_eq!(summary.state, EngineState::Won);
        assert!(output.ends_with("1@2\n12@\n011\nYOU WIN!\n7 2\n"));
    }

    #[test]
    fn host_loses_on_wrong_mark() {
        let (summary, output) = host(&format!("{SAMPLE}1 0 1\n"));

        assert_eq!(summary.marked, 0);
        assert_eq!(output, "???\nX??\n???\nGAME OVER!\n0 0\n");
    }

    #[test]
    fn host_skips_malformed_lines_and_ignores_bad_coordinates() {
        let (summary, output) = host(&format!("{SAMPLE}hello\n0 0 7\n-3 1 0\n"));

        assert_eq!(summary.state, EngineState::Playing);
        assert_eq!(output, "???\n???\n???\nGAME OVER!\n0 0\n");
    }

    #[test]
    fn host_rejects_malformed_map() {
        let err = run_host(&mut LineReader::new("2 2\n..\n.\n".as_bytes()), &mut Vec::<u8>::new())
            .unwrap_err();

        assert!(matches!(err, ProtocolError::ColumnCountMismatch { .. }));
    }

    fn client(input: &str) -> (usize, String) {
        let mut out = Vec::new();
        let moves = run_client(
            &mut LineReader::new(input.as_bytes()),
            &mut out,
            &mut InferenceSolver,
        )
        .unwrap();
        (moves, String::from_utf8(out).unwrap())
    }

    #[test]
    fn client_opens_then_answers_each_board() {
        let (moves, output) = client("3 3\n2 0\n???\n12?\n01?\n1??\n12?\n01?\nYOU WIN!\n7 2\n");

        assert_eq!(moves, 3);
        assert_eq!(output, "2 0 0\n0 0 0\n0 1 1\n");
    }

    #[test]
    fn client_stays_silent_after_losing_board() {
        let (moves, output) = client("3 3\n2 0\n???\n12?\n01?\n?X?\n12?\n01?\nGAME OVER!\n4 0\n");

        assert_eq!(moves, 2);
        assert_eq!(output, "2 0 0\n0 0 0\n");
    }

    #[test]
    fn client_stays_silent_after_winning_board() {
        let (moves, output) = client("3 3\n2 0\n???\n12?\n01?\n1@2\n12@\n011\nYOU WIN!\n7 2\n");

        assert_eq!(moves, 2);
        assert_eq!(output, "2 0 0\n0 0 0\n");
    }

    #[test]
    fn client_follows_a_whole_hosted_game() {
        let (_, hosted) = host(&format!("{SAMPLE}2 0 0\n0 0 0\n0 1 1\n0 2 0\n1 2 1\n2 2 0\n"));
        let (moves, output) = client(&format!("3 3\n2 0\n{hosted}"));

        assert!(hosted.ends_with("YOU WIN!\n7 2\n"));
        assert_eq!(moves, 6);
        assert_eq!(output, "2 0 0\n0 0 0\n0 1 1\n0 2 0\n1 2 1\n2 2 0\n");
    }
}
