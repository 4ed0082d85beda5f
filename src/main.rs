fn main() -> Result<(), anyhow::Error> {
  maze_of_kindred::main()
}
