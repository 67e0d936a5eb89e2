use piece_buffer::Buffer;

fn main() {
    let mut buffer = Buffer::from_string("one two three");

    buffer.insert("and a ", 4).unwrap();
    buffer.insert("and a ", 14).unwrap();
    buffer.delete(7, 2).unwrap();
    assert_eq!(buffer.contents(), "one and two and a three");
    println!("{buffer} ({} pieces)", buffer.piece_count());

    // Every edit is undone on its own, newest first.
    while buffer.undo() {
        println!("undo -> {buffer}");
    }
    assert_eq!(buffer.contents(), "one two three");

    // Lines are read lazily; reading far down fills the line cache as it goes.
    let mut buffer = Buffer::from_string("a\nb\nc\n");
    let lines: Vec<String> = buffer.lazy_lines(1).collect();
    assert_eq!(lines, ["b\n", "c\n"]);
    println!("known line starts: {:?}", buffer.line_index().as_slice());
}
