pub const HELP: &str = "\
Available commands:
S[tudent]: <lastname>                  - Find a student by surname
S[tudent]: <lastname> B[us]            - Show a student's bus route
T[eacher]: <lastname>                  - List a teacher's students
B[us]: <number>                        - List students on a bus route
G[rade]: <number>                      - List students in a grade
G[rade]: <number> T[eacher]            - List teachers of a grade
C[lassroom]: <number>                  - List students in a classroom
C[lassroom]: <number> T[eacher]        - List teachers of a classroom

A[DD] S[tudent]                        - Add a new student
A[DD] T[eacher]                        - Add a new teacher
D[ELETE] S[tudent] <lastname> [first]  - Delete students (give a first name to narrow it)
U[PDATE] S[tudent] <lastname> [first]  - Update a student (give a first name to narrow it)

STAT[S]                                - Show statistics
SAVE J[SON]                            - Export data to JSON
SAVE X[ML]                             - Export data to XML
H[ELP]                                 - Show this help
Q[UIT]                                 - Exit
";
