mod conflicts;
mod expansion;
